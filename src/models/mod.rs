// 基本的なデータ型と幾何ユーティリティ
pub mod common;

// エージェントの基本インターフェース（trait）定義
pub mod traits;

// 共有サービス（マップ遮蔽・隠蔽・移動・騒音）
pub mod concealment;
pub mod map;
pub mod movement;
pub mod noise;

// 各エージェントモデルの実装
pub mod camera;
pub mod guard;
pub mod operative;

// 便利な re-export
pub use camera::Camera;
pub use common::*;
pub use concealment::{ConcealmentField, HidingSpot, SmokeCloud};
pub use guard::{Guard, GuardState};
pub use map::{Door, MissionMap};
pub use movement::{move_towards, ARRIVAL_RADIUS};
pub use operative::{AbilityKind, NoisePulse, Operative};
pub use traits::*;
