use crate::models::common::{math_utils, Position2D, Rect};

/// ドア
///
/// 開閉状態を持つ軸平行矩形です。閉じている間のみ不透過かつ通行不可
/// となり、視線遮蔽と移動判定の両方に影響します。
#[derive(Debug, Clone)]
pub struct Door {
    pub id: u32,
    pub rect: Rect,
    pub open: bool,
    /// リセット時に復元する初期開閉状態
    pub initially_open: bool,
}

impl Door {
    pub fn new(id: u32, rect: Rect, open: bool) -> Self {
        Self {
            id,
            rect,
            open,
            initially_open: open,
        }
    }
}

/// ミッションマップ
///
/// 静的ジオメトリ（障害物・ドア・脱出地点）を保持し、遮蔽サービスを
/// 提供します。障害物は常に不透過・通行不可、ドアは閉時のみ同様です。
#[derive(Debug, Clone)]
pub struct MissionMap {
    pub obstacles: Vec<Rect>,
    pub doors: Vec<Door>,
    /// 脱出地点（全工作員が同時に内側にいればミッション成功）
    pub extraction_zone: Rect,
}

impl MissionMap {
    pub fn new(obstacles: Vec<Rect>, doors: Vec<Door>, extraction_zone: Rect) -> Self {
        Self {
            obstacles,
            doors,
            extraction_zone,
        }
    }

    /// 点が通行不可領域（障害物または閉ドア）の内側かどうか
    ///
    /// 移動判定はこの点判定のみを使用します。線分判定は検知エンジン
    /// 専用です（§視線遮蔽）。
    pub fn is_point_blocked(&self, point: Position2D) -> bool {
        for obstacle in &self.obstacles {
            if obstacle.contains(point) {
                return true;
            }
        }
        for door in &self.doors {
            if !door.open && door.rect.contains(point) {
                return true;
            }
        }
        false
    }

    /// 視線a→bが遮蔽されるかどうか
    ///
    /// 線分が障害物または閉ドアと交差（サンプリング近似）する場合に
    /// trueを返します。
    pub fn is_line_blocked(&self, a: Position2D, b: Position2D) -> bool {
        for obstacle in &self.obstacles {
            if math_utils::segment_intersects_rect(a, b, obstacle) {
                return true;
            }
        }
        for door in &self.doors {
            if !door.open && math_utils::segment_intersects_rect(a, b, &door.rect) {
                return true;
            }
        }
        false
    }

    /// 指定位置にあるドアの開閉を切り替え
    ///
    /// # 戻り値
    ///
    /// 位置にドアが存在し切り替えた場合はtrue
    pub fn toggle_door_at(&mut self, point: Position2D) -> bool {
        for door in &mut self.doors {
            if door.rect.contains(point) {
                door.open = !door.open;
                return true;
            }
        }
        false
    }

    /// 最寄りのドアを検索
    ///
    /// 距離はドア矩形の原点（左上隅）を基準に測ります。
    ///
    /// # 戻り値
    ///
    /// (ドアのインデックス, 距離)、ドアが存在しない場合はNone
    pub fn nearest_door(&self, point: Position2D) -> Option<(usize, f64)> {
        let mut closest: Option<(usize, f64)> = None;
        for (index, door) in self.doors.iter().enumerate() {
            let dist = point.distance_to(&door.rect.origin());
            if closest.is_none_or(|(_, best)| dist < best) {
                closest = Some((index, dist));
            }
        }
        closest
    }

    /// 全ドアを初期開閉状態へ復元
    pub fn reset_doors(&mut self) {
        for door in &mut self.doors {
            door.open = door.initially_open;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_map() -> MissionMap {
        MissionMap::new(
            vec![Rect::new(100.0, 100.0, 50.0, 50.0)],
            vec![
                Door::new(1, Rect::new(200.0, 100.0, 20.0, 50.0), false),
                Door::new(2, Rect::new(300.0, 100.0, 20.0, 50.0), true),
            ],
            Rect::new(500.0, 500.0, 80.0, 80.0),
        )
    }

    #[test]
    fn test_point_blocked_by_obstacle() {
        let map = test_map();
        assert!(map.is_point_blocked(Position2D::new(120.0, 120.0)));
        assert!(!map.is_point_blocked(Position2D::new(90.0, 90.0)));
    }

    #[test]
    fn test_point_blocked_by_closed_door_only() {
        let map = test_map();
        assert!(map.is_point_blocked(Position2D::new(210.0, 120.0)));
        // 開いているドアは通行可能
        assert!(!map.is_point_blocked(Position2D::new(310.0, 120.0)));
    }

    #[test]
    fn test_line_blocked_by_obstacle() {
        let map = test_map();
        let a = Position2D::new(50.0, 125.0);
        let b = Position2D::new(180.0, 125.0);
        assert!(map.is_line_blocked(a, b));
    }

    #[test]
    fn test_line_through_open_door_clear() {
        let map = test_map();
        let a = Position2D::new(290.0, 125.0);
        let b = Position2D::new(330.0, 125.0);
        assert!(!map.is_line_blocked(a, b));
    }

    #[test]
    fn test_line_through_closed_door_blocked() {
        let map = test_map();
        let a = Position2D::new(190.0, 125.0);
        let b = Position2D::new(230.0, 125.0);
        assert!(map.is_line_blocked(a, b));
    }

    #[test]
    fn test_toggle_door_at() {
        let mut map = test_map();
        assert!(map.toggle_door_at(Position2D::new(210.0, 120.0)));
        assert!(map.doors[0].open);
        assert!(!map.toggle_door_at(Position2D::new(0.0, 0.0)));
    }

    #[test]
    fn test_nearest_door() {
        let map = test_map();
        let (index, dist) = map.nearest_door(Position2D::new(205.0, 100.0)).unwrap();
        assert_eq!(index, 0);
        assert!(dist < 10.0);
    }

    #[test]
    fn test_reset_doors() {
        let mut map = test_map();
        map.doors[0].open = true;
        map.doors[1].open = false;
        map.reset_doors();
        assert!(!map.doors[0].open);
        assert!(map.doors[1].open);
    }
}
