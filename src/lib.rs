//! # infilsim (潜入戦術シミュレーション)
//!
//! 工作員が障害物・ドア・巡回歩哨・監視カメラの配置されたマップを
//! 検知されずに横断し、脱出地点への到達を目指すリアルタイム
//! シミュレーションのコアエンジンです。
//!
//! 描画と生の入力処理は外部コラボレータの責務であり、本クレートは
//! コマンドAPI（選択・移動指示・アビリティ・一時停止・リセット）と
//! 読み取り専用の状態公開のみを提供します。

pub mod detection;
pub mod logging;
pub mod models;
pub mod scenario;
pub mod simulation;
