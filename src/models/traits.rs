use crate::models::common::Position2D;

/// 視覚検知源（歩哨・監視カメラ）が実装する基本インターフェース
///
/// 検知エンジンはこのインターフェースを通じて検知源の種別に依存せず
/// 視野判定と遮蔽判定を行います。
pub trait IObserver {
    /// 観測位置の取得
    fn observer_position(&self) -> Position2D;

    /// 検知距離の取得
    fn detection_range(&self) -> f64;

    /// 視野全角（ラジアン）の取得
    fn field_of_view(&self) -> f64;

    /// 現在の向き（ラジアン）の取得
    fn facing(&self) -> f64;

    /// 現在検知可能な状態かどうか
    ///
    /// 無効化中の監視カメラはfalseを返し、検知処理全体がスキップされます。
    fn is_observing(&self) -> bool;
}
