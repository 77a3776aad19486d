use crate::models::common::Position2D;
use crate::models::map::MissionMap;

/// 到達判定距離
///
/// 目標までの残距離がこの値未満になったとき、呼び出し側は次の
/// ウェイポイントへ進みます。
pub const ARRIVAL_RADIUS: f64 = 4.0;

/// 即時到達とみなす最小距離
///
/// この距離未満では移動計算を行わず到達を返します。方向ベクトルが
/// ゼロ長になるケースのゼロ除算回避を兼ねます。
const MIN_STEP_DISTANCE: f64 = 1.0;

/// エンティティを目標へ向けて前進させる共有移動リゾルバ
///
/// 目標への直線方向に`speed * dt`だけ前進させます。移動先の点が
/// 通行不可領域（障害物・閉ドア）内の場合は位置を更新しません。
/// 判定は点に対してのみ行うため、1ステップが薄いジオメトリを
/// またぐ場合はすり抜けが起こり得ます（許容された近似）。
/// 工作員と歩哨の両方がこの関数を使用し、移動規則を一致させます。
///
/// # 戻り値
///
/// 移動前の残距離が到達判定距離未満であればtrue
pub fn move_towards(
    position: &mut Position2D,
    target: Position2D,
    speed: f64,
    dt: f64,
    map: &MissionMap,
) -> bool {
    let delta = target - *position;
    let dist = delta.magnitude();
    if dist < MIN_STEP_DISTANCE {
        return true;
    }
    let step = speed * dt / dist;
    let next = *position + delta * step;
    if !map.is_point_blocked(next) {
        *position = next;
    }
    dist < ARRIVAL_RADIUS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::Rect;
    use crate::models::map::Door;

    fn open_map() -> MissionMap {
        MissionMap::new(Vec::new(), Vec::new(), Rect::new(0.0, 0.0, 0.0, 0.0))
    }

    #[test]
    fn test_advances_toward_target() {
        let map = open_map();
        let mut position = Position2D::new(0.0, 0.0);
        let arrived = move_towards(&mut position, Position2D::new(100.0, 0.0), 10.0, 1.0, &map);
        assert!(!arrived);
        assert!((position.x - 10.0).abs() < 1e-9);
        assert_eq!(position.y, 0.0);
    }

    #[test]
    fn test_immediate_arrival_below_epsilon() {
        let map = open_map();
        let mut position = Position2D::new(50.0, 50.0);
        let target = Position2D::new(50.5, 50.0);
        let arrived = move_towards(&mut position, target, 100.0, 1.0, &map);
        assert!(arrived);
        // 距離が最小値未満なら位置は変化しない
        assert_eq!(position, Position2D::new(50.0, 50.0));
    }

    #[test]
    fn test_arrival_within_radius() {
        let map = open_map();
        let mut position = Position2D::new(0.0, 0.0);
        let target = Position2D::new(3.0, 0.0);
        assert!(move_towards(&mut position, target, 1.0, 0.1, &map));
    }

    #[test]
    fn test_blocked_step_leaves_position_unchanged() {
        let map = MissionMap::new(
            vec![Rect::new(10.0, -10.0, 20.0, 20.0)],
            Vec::new(),
            Rect::new(0.0, 0.0, 0.0, 0.0),
        );
        let mut position = Position2D::new(5.0, 0.0);
        let target = Position2D::new(50.0, 0.0);
        // 障害物の中へ踏み込むステップは拒否され、繰り返しても位置は不変
        for _ in 0..10 {
            move_towards(&mut position, target, 100.0, 0.1, &map);
            assert_eq!(position, Position2D::new(5.0, 0.0));
        }
    }

    #[test]
    fn test_closed_door_blocks_open_door_admits() {
        let door_rect = Rect::new(10.0, -10.0, 10.0, 20.0);
        let mut map = MissionMap::new(
            Vec::new(),
            vec![Door::new(1, door_rect, false)],
            Rect::new(0.0, 0.0, 0.0, 0.0),
        );
        let target = Position2D::new(15.0, 0.0);

        let mut blocked = Position2D::new(5.0, 0.0);
        move_towards(&mut blocked, target, 100.0, 0.1, &map);
        assert_eq!(blocked, Position2D::new(5.0, 0.0));

        map.doors[0].open = true;
        let mut free = Position2D::new(5.0, 0.0);
        move_towards(&mut free, target, 100.0, 0.1, &map);
        assert!(free.x > 5.0);
    }

    #[test]
    fn test_guard_and_operative_share_resolver() {
        // 同一パラメータで呼べば同一の移動結果になる
        let map = open_map();
        let target = Position2D::new(100.0, 100.0);
        let mut a = Position2D::new(0.0, 0.0);
        let mut b = Position2D::new(0.0, 0.0);
        move_towards(&mut a, target, 80.0, 0.016, &map);
        move_towards(&mut b, target, 80.0, 0.016, &map);
        assert_eq!(a, b);
    }
}
