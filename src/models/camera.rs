use crate::models::common::Position2D;
use crate::models::traits::IObserver;

/// 旋回速度（ラジアン/秒）
pub const ROTATION_RATE: f64 = 0.4;
/// アビリティによる無効化の持続時間（秒）
pub const DISABLE_DURATION_S: f64 = 10.0;

/// 監視カメラエージェント
///
/// 固定位置の受動的な検知源です。無効化されていない間は一定速度で
/// 旋回を続けます。カメラ自身は警戒状態を持たず、検知時は全体警報
/// のみに寄与します。
#[derive(Debug, Clone)]
pub struct Camera {
    pub id: u32,
    pub position: Position2D,
    /// 検知距離
    pub range: f64,
    /// 視野全角（ラジアン）
    pub fov: f64,
    /// 現在の向き（ラジアン、旋回で単調増加）
    pub direction: f64,
    /// 無効化の残り時間（秒）
    pub disabled_timer: f64,
}

impl Camera {
    pub fn new(id: u32, position: Position2D, range: f64, fov: f64, direction: f64) -> Self {
        Self {
            id,
            position,
            range,
            fov,
            direction,
            disabled_timer: 0.0,
        }
    }

    /// 無効化中かどうか
    pub fn is_disabled(&self) -> bool {
        self.disabled_timer > 0.0
    }

    /// アビリティによる無効化
    pub fn disable(&mut self) {
        self.disabled_timer = DISABLE_DURATION_S;
    }

    /// 1ティックの処理
    ///
    /// 無効化中はタイマーを消化し、旋回しません。それ以外は一定速度で
    /// 旋回します。
    pub fn tick(&mut self, dt: f64) {
        if self.disabled_timer > 0.0 {
            self.disabled_timer = (self.disabled_timer - dt).max(0.0);
        } else {
            self.direction += dt * ROTATION_RATE;
        }
    }
}

impl IObserver for Camera {
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
        !self.is_disabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn camera() -> Camera {
        Camera::new(1, Position2D::new(640.0, 110.0), 160.0, PI / 2.0, PI / 2.0)
    }

    #[test]
    fn test_passive_rotation() {
        let mut cam = camera();
        cam.tick(0.5);
        assert!((cam.direction - (PI / 2.0 + 0.5 * ROTATION_RATE)).abs() < 1e-9);
    }

    #[test]
    fn test_disable_freezes_rotation() {
        let mut cam = camera();
        let before = cam.direction;
        cam.disable();
        assert!(cam.is_disabled());
        assert!(!cam.is_observing());
        cam.tick(1.0);
        assert_eq!(cam.direction, before);
        assert!((cam.disabled_timer - (DISABLE_DURATION_S - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_disable_expires_then_rotation_resumes() {
        let mut cam = camera();
        let before = cam.direction;
        cam.disable();
        cam.tick(DISABLE_DURATION_S);
        assert!(!cam.is_disabled());
        assert_eq!(cam.direction, before);
        cam.tick(0.25);
        assert!((cam.direction - (before + 0.25 * ROTATION_RATE)).abs() < 1e-9);
    }
}
