use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::models::common::Position2D;
use crate::models::map::MissionMap;
use crate::models::movement::move_towards;

/// 工作員の固有アビリティ種別
///
/// アビリティは工作員の編成定義に固定で紐付き、実行時の付け替えは
/// できません。各種別が自身のクールダウン定数とコマンドスロット番号を
/// 保持します。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    /// 煙幕展開（自身の位置に隠蔽領域を生成）
    SmokeScreen,
    /// 監視カメラ無効化（近傍のカメラを一定時間停止）
    DisableCamera,
    /// ドア突破（近傍のドアを強制開放、大音響を伴う）
    BreachDoor,
}

impl AbilityKind {
    /// 実行後のクールダウン（秒）
    pub fn cooldown_s(&self) -> f64 {
        match self {
            AbilityKind::SmokeScreen => 10.0,
            AbilityKind::DisableCamera => 12.0,
            AbilityKind::BreachDoor => 8.0,
        }
    }

    /// 入力コマンドのスロット番号（1〜3）
    pub fn slot(&self) -> u8 {
        match self {
            AbilityKind::SmokeScreen => 1,
            AbilityKind::DisableCamera => 2,
            AbilityKind::BreachDoor => 3,
        }
    }

    /// スロット番号からアビリティ種別を引く
    pub fn from_slot(slot: u8) -> Option<Self> {
        match slot {
            1 => Some(AbilityKind::SmokeScreen),
            2 => Some(AbilityKind::DisableCamera),
            3 => Some(AbilityKind::BreachDoor),
            _ => None,
        }
    }

    /// ロスター表示用の名称
    pub fn display_name(&self) -> &'static str {
        match self {
            AbilityKind::SmokeScreen => "Smoke screen",
            AbilityKind::DisableCamera => "Disable camera",
            AbilityKind::BreachDoor => "Breach door",
        }
    }
}

/// 騒音パルス（表示用の一時状態）
#[derive(Debug, Clone, Copy)]
pub struct NoisePulse {
    pub radius: f64,
    /// 残り表示時間（秒）
    pub timer: f64,
}

/// 工作員エージェント
///
/// プレイヤーが操作する潜入要員です。ウェイポイントキューを先頭から
/// 消費して移動し、移動中は足音による騒音パルスを発します。
#[derive(Debug, Clone)]
pub struct Operative {
    pub id: u32,
    pub name: String,
    pub position: Position2D,
    /// 移動速度（単位/秒）
    pub speed: f64,
    /// 基本騒音半径
    pub noise: f64,
    /// 視界半径（ロスター表示用、検知判定には関与しない）
    pub vision: f64,
    pub ability: AbilityKind,
    pub selected: bool,
    /// 移動経路のウェイポイントキュー（先頭から消費）
    pub queue: VecDeque<Position2D>,
    /// アビリティの残りクールダウン（秒）
    pub ability_cooldown: f64,
    pub noise_pulse: Option<NoisePulse>,
    /// リセット時に復元する初期位置
    pub start_position: Position2D,
}

impl Operative {
    pub fn new(
        id: u32,
        name: String,
        position: Position2D,
        speed: f64,
        noise: f64,
        vision: f64,
        ability: AbilityKind,
    ) -> Self {
        Self {
            id,
            name,
            position,
            speed,
            noise,
            vision,
            ability,
            selected: false,
            queue: VecDeque::new(),
            ability_cooldown: 0.0,
            noise_pulse: None,
            start_position: position,
        }
    }

    /// 現在のウェイポイントへ前進し、到達したら次へ進む
    ///
    /// # 戻り値
    ///
    /// このティックの開始時点でウェイポイントが存在していたか
    /// （足音パルスの発生条件）
    pub fn advance(&mut self, dt: f64, map: &MissionMap) -> bool {
        let Some(&target) = self.queue.front() else {
            return false;
        };
        if move_towards(&mut self.position, target, self.speed, dt, map) {
            self.queue.pop_front();
        }
        true
    }

    /// クールダウンとパルスタイマーの時間経過処理
    pub fn tick_timers(&mut self, dt: f64) {
        if self.ability_cooldown > 0.0 {
            self.ability_cooldown = (self.ability_cooldown - dt).max(0.0);
        }
        if let Some(pulse) = &mut self.noise_pulse {
            pulse.timer -= dt;
            if pulse.timer <= 0.0 {
                self.noise_pulse = None;
            }
        }
    }

    /// アビリティが使用可能かどうか
    pub fn ability_ready(&self) -> bool {
        self.ability_cooldown <= 0.0
    }

    /// 初期状態へ復元（選択状態は維持される）
    pub fn reset(&mut self) {
        self.position = self.start_position;
        self.queue.clear();
        self.ability_cooldown = 0.0;
        self.noise_pulse = None;
    }
}
