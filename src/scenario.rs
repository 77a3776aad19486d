use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::models::operative::AbilityKind;

/// シナリオメタデータ
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioMeta {
    pub version: String,
    pub name: String,
    pub description: String,
}

/// シミュレーション設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    pub dt_s: f64,
    pub t_max_s: f64,
}

/// 世界設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct PointConfig {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct RectConfig {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// ドア設定
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct DoorConfig {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub open: bool,
}

/// 隠れ場所設定
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct HidingSpotConfig {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

/// 監視カメラ設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CameraConfig {
    pub id: u32,
    pub pos: PointConfig,
    pub range: f64,
    pub fov_rad: f64,
    pub direction_rad: f64,
}

/// 工作員設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OperativeConfig {
    pub id: u32,
    pub name: String,
    pub pos: PointConfig,
    pub speed: f64,
    pub noise_radius: f64,
    pub vision_radius: f64,
    pub ability: AbilityKind,
    #[serde(default)]
    pub selected: bool,
}

/// 歩哨設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GuardConfig {
    pub id: u32,
    pub pos: PointConfig,
    pub speed: f64,
    pub range: f64,
    pub fov_rad: f64,
    pub direction_rad: f64,
    pub patrol: Vec<PointConfig>,
}

/// 完全なミッション設定
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MissionConfig {
    pub meta: ScenarioMeta,
    pub sim: SimulationConfig,
    pub world: WorldConfig,
    pub obstacles: Vec<RectConfig>,
    pub doors: Vec<DoorConfig>,
    pub hiding_spots: Vec<HidingSpotConfig>,
    pub extraction_zone: RectConfig,
    pub cameras: Vec<CameraConfig>,
    pub operatives: Vec<OperativeConfig>,
    pub guards: Vec<GuardConfig>,
}

impl MissionConfig {
    /// YAMLファイルからミッション設定を読み込み
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.to_path_buf()));
        }

        let contents =
            fs::read_to_string(path).map_err(|e| ScenarioError::IoError(path.to_path_buf(), e))?;

        let config: MissionConfig = serde_yaml::from_str(&contents)
            .map_err(|e| ScenarioError::ParseError(path.to_path_buf(), e))?;

        config.validate()?;

        Ok(config)
    }

    /// 設定の基本的な検証
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.sim.dt_s <= 0.0 {
            return Err(ScenarioError::ValidationError(
                "dt_s must be positive".to_string(),
            ));
        }
        if self.sim.t_max_s <= 0.0 {
            return Err(ScenarioError::ValidationError(
                "t_max_s must be positive".to_string(),
            ));
        }
        if self.world.width <= 0.0 || self.world.height <= 0.0 {
            return Err(ScenarioError::ValidationError(
                "world dimensions must be positive".to_string(),
            ));
        }
        if self.operatives.is_empty() {
            return Err(ScenarioError::ValidationError(
                "at least one operative is required".to_string(),
            ));
        }

        for operative in &self.operatives {
            if !self.is_position_in_bounds(operative.pos.x, operative.pos.y) {
                return Err(ScenarioError::ValidationError(format!(
                    "operative {} outside world bounds",
                    operative.name
                )));
            }
        }

        for guard in &self.guards {
            if guard.patrol.is_empty() {
                return Err(ScenarioError::ValidationError(format!(
                    "guard {} has an empty patrol route",
                    guard.id
                )));
            }
            if guard.fov_rad <= 0.0 {
                return Err(ScenarioError::ValidationError(format!(
                    "guard {} has a non-positive fov",
                    guard.id
                )));
            }
            if !self.is_position_in_bounds(guard.pos.x, guard.pos.y) {
                return Err(ScenarioError::ValidationError(format!(
                    "guard {} outside world bounds",
                    guard.id
                )));
            }
        }

        for camera in &self.cameras {
            if camera.fov_rad <= 0.0 {
                return Err(ScenarioError::ValidationError(format!(
                    "camera {} has a non-positive fov",
                    camera.id
                )));
            }
        }

        Ok(())
    }

    /// 位置が世界領域内かどうかをチェック
    fn is_position_in_bounds(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && x <= self.world.width && y >= 0.0 && y <= self.world.height
    }

    /// シナリオの概要を表示
    pub fn print_summary(&self) {
        println!("=== シナリオ情報 ===");
        println!("名前: {}", self.meta.name);
        println!("説明: {}", self.meta.description);
        println!("バージョン: {}", self.meta.version);
        println!();

        println!("=== シミュレーション設定 ===");
        println!("時間刻み: {:.4}秒", self.sim.dt_s);
        println!("最大時間: {:.1}秒", self.sim.t_max_s);
        println!();

        println!("=== 潜入チーム ===");
        println!("工作員: {}名", self.operatives.len());
        for operative in &self.operatives {
            println!(
                "  {}: {} (速度 {:.0} / 騒音 {:.0} / 視界 {:.0})",
                operative.name,
                operative.ability.display_name(),
                operative.speed,
                operative.noise_radius,
                operative.vision_radius,
            );
        }
        println!();

        println!("=== 警備網 ===");
        println!("歩哨: {}名", self.guards.len());
        println!("監視カメラ: {}基", self.cameras.len());
        println!("ドア: {}箇所", self.doors.len());
        println!("障害物: {}件", self.obstacles.len());
        println!("隠れ場所: {}箇所", self.hiding_spots.len());
    }
}

impl Default for MissionConfig {
    /// 組み込みの標準ミッション
    fn default() -> Self {
        use std::f64::consts::PI;

        Self {
            meta: ScenarioMeta {
                version: "1.0".to_string(),
                name: "standard-infiltration".to_string(),
                description: "標準の潜入ミッション（組み込みレイアウト）".to_string(),
            },
            sim: SimulationConfig {
                dt_s: 1.0 / 60.0,
                t_max_s: 180.0,
            },
            world: WorldConfig {
                width: 1080.0,
                height: 720.0,
            },
            obstacles: vec![
                RectConfig { x: 160.0, y: 120.0, w: 240.0, h: 60.0 },
                RectConfig { x: 460.0, y: 160.0, w: 120.0, h: 220.0 },
                RectConfig { x: 700.0, y: 80.0, w: 260.0, h: 70.0 },
                RectConfig { x: 720.0, y: 260.0, w: 220.0, h: 70.0 },
                RectConfig { x: 260.0, y: 360.0, w: 200.0, h: 80.0 },
                RectConfig { x: 110.0, y: 500.0, w: 180.0, h: 80.0 },
                RectConfig { x: 430.0, y: 520.0, w: 180.0, h: 90.0 },
                RectConfig { x: 780.0, y: 520.0, w: 220.0, h: 110.0 },
            ],
            doors: vec![
                DoorConfig { id: 1, x: 400.0, y: 250.0, w: 30.0, h: 60.0, open: false },
                DoorConfig { id: 2, x: 640.0, y: 270.0, w: 30.0, h: 60.0, open: false },
                DoorConfig { id: 3, x: 350.0, y: 450.0, w: 60.0, h: 26.0, open: true },
            ],
            hiding_spots: vec![
                HidingSpotConfig { x: 110.0, y: 80.0, r: 38.0 },
                HidingSpotConfig { x: 940.0, y: 400.0, r: 40.0 },
                HidingSpotConfig { x: 180.0, y: 650.0, r: 40.0 },
            ],
            extraction_zone: RectConfig { x: 980.0, y: 620.0, w: 90.0, h: 80.0 },
            cameras: vec![
                CameraConfig {
                    id: 1,
                    pos: PointConfig { x: 640.0, y: 110.0 },
                    range: 160.0,
                    fov_rad: PI / 2.0,
                    direction_rad: PI / 2.0,
                },
                CameraConfig {
                    id: 2,
                    pos: PointConfig { x: 880.0, y: 300.0 },
                    range: 150.0,
                    fov_rad: PI / 2.5,
                    direction_rad: PI,
                },
            ],
            operatives: vec![
                OperativeConfig {
                    id: 1,
                    name: "Specter".to_string(),
                    pos: PointConfig { x: 80.0, y: 620.0 },
                    speed: 120.0,
                    noise_radius: 110.0,
                    vision_radius: 180.0,
                    ability: AbilityKind::SmokeScreen,
                    selected: true,
                },
                OperativeConfig {
                    id: 2,
                    name: "Cipher".to_string(),
                    pos: PointConfig { x: 120.0, y: 660.0 },
                    speed: 110.0,
                    noise_radius: 90.0,
                    vision_radius: 160.0,
                    ability: AbilityKind::DisableCamera,
                    selected: false,
                },
                OperativeConfig {
                    id: 3,
                    name: "Vanguard".to_string(),
                    pos: PointConfig { x: 60.0, y: 690.0 },
                    speed: 100.0,
                    noise_radius: 140.0,
                    vision_radius: 150.0,
                    ability: AbilityKind::BreachDoor,
                    selected: false,
                },
            ],
            guards: vec![
                GuardConfig {
                    id: 1,
                    pos: PointConfig { x: 320.0, y: 200.0 },
                    speed: 80.0,
                    range: 220.0,
                    fov_rad: PI / 2.2,
                    direction_rad: 0.0,
                    patrol: vec![
                        PointConfig { x: 280.0, y: 200.0 },
                        PointConfig { x: 380.0, y: 200.0 },
                        PointConfig { x: 380.0, y: 320.0 },
                        PointConfig { x: 280.0, y: 320.0 },
                    ],
                },
                GuardConfig {
                    id: 2,
                    pos: PointConfig { x: 820.0, y: 160.0 },
                    speed: 90.0,
                    range: 240.0,
                    fov_rad: PI / 1.9,
                    direction_rad: PI,
                    patrol: vec![
                        PointConfig { x: 760.0, y: 130.0 },
                        PointConfig { x: 940.0, y: 130.0 },
                        PointConfig { x: 940.0, y: 260.0 },
                        PointConfig { x: 760.0, y: 260.0 },
                    ],
                },
                GuardConfig {
                    id: 3,
                    pos: PointConfig { x: 520.0, y: 580.0 },
                    speed: 85.0,
                    range: 200.0,
                    fov_rad: PI / 2.4,
                    direction_rad: PI / 2.0,
                    patrol: vec![
                        PointConfig { x: 520.0, y: 520.0 },
                        PointConfig { x: 600.0, y: 620.0 },
                        PointConfig { x: 460.0, y: 660.0 },
                        PointConfig { x: 420.0, y: 560.0 },
                    ],
                },
            ],
        }
    }
}

/// シナリオ読み込みエラー
#[derive(Debug)]
pub enum ScenarioError {
    FileNotFound(std::path::PathBuf),
    IoError(std::path::PathBuf, std::io::Error),
    ParseError(std::path::PathBuf, serde_yaml::Error),
    ValidationError(String),
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioError::FileNotFound(path) => {
                write!(f, "シナリオファイルが見つかりません: {}", path.display())
            }
            ScenarioError::IoError(path, err) => {
                write!(f, "ファイル読み込みエラー {}: {}", path.display(), err)
            }
            ScenarioError::ParseError(path, err) => {
                write!(f, "YAML解析エラー {}: {}", path.display(), err)
            }
            ScenarioError::ValidationError(msg) => {
                write!(f, "設定検証エラー: {}", msg)
            }
        }
    }
}

impl std::error::Error for ScenarioError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MissionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.operatives.len(), 3);
        assert_eq!(config.guards.len(), 3);
        assert_eq!(config.cameras.len(), 2);
        assert_eq!(config.doors.len(), 3);
        // 3番ドアだけが初期状態で開いている
        assert!(!config.doors[0].open);
        assert!(!config.doors[1].open);
        assert!(config.doors[2].open);
    }

    #[test]
    fn test_validate_rejects_bad_dt() {
        let mut config = MissionConfig::default();
        config.sim.dt_s = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_patrol() {
        let mut config = MissionConfig::default();
        config.guards[0].patrol.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_no_operatives() {
        let mut config = MissionConfig::default();
        config.operatives.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_bounds_guard() {
        let mut config = MissionConfig::default();
        config.guards[0].pos.x = -10.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_missing_path() {
        let result = MissionConfig::from_file("missions/does_not_exist.yaml");
        assert!(matches!(result, Err(ScenarioError::FileNotFound(_))));
    }

    #[test]
    fn test_yaml_parse_of_ability_kinds() {
        let yaml = r#"
id: 9
name: "Ghost"
pos: { x: 10.0, y: 20.0 }
speed: 100.0
noise_radius: 80.0
vision_radius: 150.0
ability: disable_camera
"#;
        let parsed: OperativeConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed.ability, AbilityKind::DisableCamera);
        // selected は省略時 false
        assert!(!parsed.selected);
    }
}
