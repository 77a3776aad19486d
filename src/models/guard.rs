use crate::models::common::Position2D;
use crate::models::map::MissionMap;
use crate::models::movement::move_towards;
use crate::models::traits::IObserver;

/// 調査移動時の速度ボーナス
pub const INVESTIGATE_SPEED_BONUS: f64 = 20.0;
/// 警戒追跡時の速度ボーナス
pub const ALERT_SPEED_BONUS: f64 = 30.0;
/// 警報下追跡時の速度ボーナス
pub const HUNT_SPEED_BONUS: f64 = 50.0;

/// 歩哨の行動状態
///
/// 遷移規則:
/// - `Patrol`（初期状態）→ 近傍の騒音で`Investigate`
/// - `Investigate` → 調査地点到達で`Patrol`へ復帰
/// - 検知エンジンによる目撃で`Alert`（目撃地点を記録）
/// - 警報中は毎ティック無条件に`Hunt`へ上書きされ、最寄りの工作員を
///   追跡する
///
/// `Alert`は自動解除されない終端状態で、リセットまで目撃地点への
/// 追跡を続けます。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// 巡回経路の周回
    Patrol,
    /// 騒音発生地点の調査
    Investigate,
    /// 警報下での最寄り工作員の追跡
    Hunt,
    /// 目撃地点への警戒追跡
    Alert,
}

/// 歩哨エージェント
///
/// 巡回経路を周回し、視覚検知と騒音への反応で行動状態を切り替える
/// 警備要員です。
#[derive(Debug, Clone)]
pub struct Guard {
    pub id: u32,
    pub position: Position2D,
    /// 基本移動速度（単位/秒）
    pub speed: f64,
    /// 検知距離
    pub range: f64,
    /// 視野全角（ラジアン）
    pub fov: f64,
    /// 現在の向き（ラジアン）
    pub direction: f64,
    /// 巡回経路（空であってはならない）
    pub patrol: Vec<Position2D>,
    pub patrol_index: usize,
    pub state: GuardState,
    /// 調査・追跡の目標地点
    pub target: Option<Position2D>,
    /// 最後に工作員を目撃した地点
    pub last_seen: Option<Position2D>,
}

impl Guard {
    pub fn new(
        id: u32,
        position: Position2D,
        speed: f64,
        range: f64,
        fov: f64,
        direction: f64,
        patrol: Vec<Position2D>,
    ) -> Self {
        Self {
            id,
            position,
            speed,
            range,
            fov,
            direction,
            patrol,
            patrol_index: 0,
            state: GuardState::Patrol,
            target: None,
            last_seen: None,
        }
    }

    /// 騒音を聞いた際の処理
    ///
    /// 現在の状態に関わらず調査状態へ遷移し、騒音発生地点を目標に
    /// 設定します（警報中は次ティックの警報規則が再び優先される）。
    pub fn hear_noise(&mut self, origin: Position2D) {
        self.state = GuardState::Investigate;
        self.target = Some(origin);
    }

    /// 検知エンジンによる目撃の記録
    ///
    /// 警戒状態へ遷移し、目撃地点を保存します。
    pub fn sight(&mut self, position: Position2D) {
        self.state = GuardState::Alert;
        self.last_seen = Some(position);
    }

    /// 1ティックの状態機械更新と移動
    ///
    /// `alarm_target`は警報中のみSome（最寄りの工作員位置）。警報中は
    /// 状態を`Hunt`へ上書きし、速度ボーナス+50で追跡します。調査は
    /// +20、警戒追跡は+30で、3つのボーナスはそれぞれ独立の値です。
    ///
    /// 向きは状態に関わらず現在の巡回ウェイポイントへ向けて毎ティック
    /// 再計算されます（追跡中も巡回先を向く参照実装の挙動を保持）。
    pub fn update(&mut self, dt: f64, map: &MissionMap, alarm_target: Option<Position2D>) {
        let patrol_target = self.patrol[self.patrol_index];

        if let Some(unit_position) = alarm_target {
            self.state = GuardState::Hunt;
            self.target = Some(unit_position);
            move_towards(
                &mut self.position,
                unit_position,
                self.speed + HUNT_SPEED_BONUS,
                dt,
                map,
            );
        } else if self.state == GuardState::Patrol {
            // 巡回ウェイポイントは巡回状態からのみ周回する（剰余で折り返し）
            if move_towards(&mut self.position, patrol_target, self.speed, dt, map) {
                self.patrol_index = (self.patrol_index + 1) % self.patrol.len();
            }
        }

        if self.state == GuardState::Investigate {
            if let Some(target) = self.target {
                if move_towards(
                    &mut self.position,
                    target,
                    self.speed + INVESTIGATE_SPEED_BONUS,
                    dt,
                    map,
                ) {
                    self.state = GuardState::Patrol;
                    self.target = None;
                }
            }
        }

        if self.state == GuardState::Alert {
            if let Some(last_seen) = self.last_seen {
                move_towards(
                    &mut self.position,
                    last_seen,
                    self.speed + ALERT_SPEED_BONUS,
                    dt,
                    map,
                );
            }
        }

        self.direction = self.position.angle_to(&patrol_target);
    }

    /// 巡回状態へ復元（位置と向きは維持される）
    pub fn reset(&mut self) {
        self.state = GuardState::Patrol;
        self.patrol_index = 0;
        self.target = None;
        self.last_seen = None;
    }
}

impl IObserver for Guard {
    fn observer_position(&self) -> Position2D {
        self.position
    }

    fn detection_range(&self) -> f64 {
        self.range
    }

    fn field_of_view(&self) -> f64 {
        self.fov
    }

    fn facing(&self) -> f64 {
        self.direction
    }

    fn is_observing(&self) -> bool {
        true
    }
}
