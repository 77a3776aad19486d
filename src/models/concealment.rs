use crate::models::common::Position2D;

/// 煙幕の半径
pub const SMOKE_RADIUS: f64 = 70.0;
/// 煙幕の持続時間（秒）
pub const SMOKE_DURATION_S: f64 = 8.0;

/// 隠れ場所（静的な円形領域）
#[derive(Debug, Clone, Copy)]
pub struct HidingSpot {
    pub position: Position2D,
    pub radius: f64,
}

impl HidingSpot {
    pub fn new(position: Position2D, radius: f64) -> Self {
        Self { position, radius }
    }
}

/// 煙幕（時限式の円形領域）
///
/// アビリティで生成され、タイマー切れでミッションループにより除去
/// されます。隠蔽効果は隠れ場所と同一です。
#[derive(Debug, Clone, Copy)]
pub struct SmokeCloud {
    pub position: Position2D,
    pub radius: f64,
    /// 残り持続時間（秒）
    pub timer: f64,
}

/// 隠蔽サービス
///
/// 隠れ場所と展開中の煙幕を保持します。隠蔽状態の工作員は視野・遮蔽の
/// 判定結果に関わらず、すべての検知源から不可視になります。
#[derive(Debug, Clone)]
pub struct ConcealmentField {
    pub hiding_spots: Vec<HidingSpot>,
    pub smoke_clouds: Vec<SmokeCloud>,
}

impl ConcealmentField {
    pub fn new(hiding_spots: Vec<HidingSpot>) -> Self {
        Self {
            hiding_spots,
            smoke_clouds: Vec::new(),
        }
    }

    /// 指定位置が隠蔽されているかどうか
    ///
    /// いずれかの隠れ場所または煙幕の半径内（境界を含む）にあれば
    /// trueを返します。
    pub fn is_hidden(&self, position: Position2D) -> bool {
        for spot in &self.hiding_spots {
            if position.distance_to(&spot.position) <= spot.radius {
                return true;
            }
        }
        for cloud in &self.smoke_clouds {
            if position.distance_to(&cloud.position) <= cloud.radius {
                return true;
            }
        }
        false
    }

    /// 指定位置に煙幕を展開
    pub fn spawn_smoke(&mut self, position: Position2D) {
        self.smoke_clouds.push(SmokeCloud {
            position,
            radius: SMOKE_RADIUS,
            timer: SMOKE_DURATION_S,
        });
    }

    /// 煙幕の時間経過処理（期限切れの煙幕は除去）
    pub fn tick(&mut self, dt: f64) {
        for cloud in &mut self.smoke_clouds {
            cloud.timer -= dt;
        }
        self.smoke_clouds.retain(|cloud| cloud.timer > 0.0);
    }

    /// 全煙幕を消去（リセット用）
    pub fn clear_smoke(&mut self) {
        self.smoke_clouds.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_in_spot() {
        let field = ConcealmentField::new(vec![HidingSpot::new(Position2D::new(100.0, 100.0), 40.0)]);
        assert!(field.is_hidden(Position2D::new(100.0, 100.0)));
        // 境界上も隠蔽
        assert!(field.is_hidden(Position2D::new(140.0, 100.0)));
        assert!(!field.is_hidden(Position2D::new(141.0, 100.0)));
    }

    #[test]
    fn test_hidden_in_smoke() {
        let mut field = ConcealmentField::new(Vec::new());
        assert!(!field.is_hidden(Position2D::new(0.0, 0.0)));
        field.spawn_smoke(Position2D::new(0.0, 0.0));
        assert!(field.is_hidden(Position2D::new(SMOKE_RADIUS, 0.0)));
        assert!(!field.is_hidden(Position2D::new(SMOKE_RADIUS + 1.0, 0.0)));
    }

    #[test]
    fn test_smoke_expires_after_duration() {
        let mut field = ConcealmentField::new(Vec::new());
        field.spawn_smoke(Position2D::new(0.0, 0.0));

        // 8秒相当のティックで除去される（浮動小数の蓄積誤差を見込んで1ティック余分）
        let dt = 0.1;
        let steps = (SMOKE_DURATION_S / dt).ceil() as u32 + 1;
        for _ in 0..steps {
            field.tick(dt);
        }
        assert!(field.smoke_clouds.is_empty());
        assert!(!field.is_hidden(Position2D::new(0.0, 0.0)));
    }

    #[test]
    fn test_smoke_persists_before_expiry() {
        let mut field = ConcealmentField::new(Vec::new());
        field.spawn_smoke(Position2D::new(0.0, 0.0));
        field.tick(SMOKE_DURATION_S / 2.0);
        assert_eq!(field.smoke_clouds.len(), 1);
        assert!(field.is_hidden(Position2D::new(0.0, 0.0)));
    }

    #[test]
    fn test_clear_smoke() {
        let mut field = ConcealmentField::new(Vec::new());
        field.spawn_smoke(Position2D::new(0.0, 0.0));
        field.spawn_smoke(Position2D::new(50.0, 50.0));
        field.clear_smoke();
        assert!(field.smoke_clouds.is_empty());
    }
}
