//! # Detection モジュール
//!
//! 毎ティックの検知走査を提供します。
//!
//! すべての(歩哨, 工作員)ペアと(カメラ, 工作員)ペアについて、
//! 以下の順で判定を行います：
//!
//! 1. **隠蔽判定**: 隠蔽中の工作員は以降の判定をすべて短絡してスキップ
//! 2. **視野判定**: 検知距離と視野角による判定
//! 3. **遮蔽判定**: 障害物・閉ドアによる視線遮蔽の判定
//!
//! 3つの判定をすべて通過した場合に検知が成立し、全体警報（粘着性、
//! リセット以外では解除されない）が発報されます。目撃地点を記録できる
//! 検知源（歩哨）は警戒状態へ遷移します。カメラは警戒状態を持たず、
//! 警報への寄与のみ行います。無効化中のカメラは視野判定を含め完全に
//! スキップされます。

use tracing::debug;

use crate::models::camera::Camera;
use crate::models::common::{math_utils, Position2D};
use crate::models::concealment::ConcealmentField;
use crate::models::guard::Guard;
use crate::models::map::MissionMap;
use crate::models::operative::Operative;
use crate::models::traits::IObserver;

/// 単一の検知源から対象位置が見えるかどうか
///
/// 隠蔽 → 視野 → 遮蔽 の順で評価します。
pub fn can_see<O: IObserver>(
    observer: &O,
    target: Position2D,
    map: &MissionMap,
    concealment: &ConcealmentField,
) -> bool {
    if !observer.is_observing() {
        return false;
    }
    if concealment.is_hidden(target) {
        return false;
    }
    if !math_utils::within_fov(
        observer.observer_position(),
        target,
        observer.detection_range(),
        observer.field_of_view(),
        observer.facing(),
    ) {
        return false;
    }
    if map.is_line_blocked(observer.observer_position(), target) {
        return false;
    }
    true
}

/// 全検知源に対する検知走査を実行
///
/// 歩哨→カメラの順で評価します。歩哨の検知は警戒遷移と目撃地点の
/// 記録を伴います。
///
/// # 戻り値
///
/// このティックで1件以上の検知が発生したかどうか（警報発報の条件）
pub fn scan(
    guards: &mut [Guard],
    cameras: &[Camera],
    operatives: &[Operative],
    map: &MissionMap,
    concealment: &ConcealmentField,
) -> bool {
    let mut detected = false;

    for guard in guards.iter_mut() {
        for operative in operatives {
            if can_see(&*guard, operative.position, map, concealment) {
                debug!(
                    "歩哨{}が{}を発見 (位置: {:.0}, {:.0})",
                    guard.id, operative.name, operative.position.x, operative.position.y
                );
                guard.sight(operative.position);
                detected = true;
            }
        }
    }

    for camera in cameras {
        for operative in operatives {
            if can_see(camera, operative.position, map, concealment) {
                debug!(
                    "カメラ{}が{}を検知 (位置: {:.0}, {:.0})",
                    camera.id, operative.name, operative.position.x, operative.position.y
                );
                detected = true;
            }
        }
    }

    detected
}
