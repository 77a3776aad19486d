//! # Simulation モジュール
//!
//! 潜入シミュレーションの中核となるミッションエンジンを提供します。
//!
//! このモジュールは、時間駆動シミュレーションのメインループを管理し、
//! すべてのエージェント（工作員、歩哨、監視カメラ、煙幕）の協調動作を
//! 制御します。エンジンは明示的なコンテキストオブジェクトとして全状態を
//! 所有し、プロセス全体のシングルトンは存在しません。
//!
//! ## ティック処理順序
//!
//! 各時間刻みにおいて、以下の順序で処理が実行されます：
//!
//! 1. **工作員処理**: ウェイポイント消費、足音騒音、タイマー消化
//! 2. **歩哨処理**: 状態機械の更新と移動
//! 3. **カメラ処理**: 無効化タイマー消化または旋回
//! 4. **煙幕処理**: 持続時間消化と期限切れの除去
//! 5. **検知処理**: 全ペアの検知走査と警報更新
//! 6. **脱出判定**: 全工作員の脱出地点到達チェック（勝利条件）
//! 7. **捕捉判定**: 歩哨の接近チェック（敗北条件）
//!
//! この順序は固定であり、検知処理は同一ティック内で移動後の位置を
//! 読むため、1ティック遅延のセマンティクス（歩哨は工作員の移動先を
//! 見る）が再現されます。一時停止中および勝敗確定後のティックは
//! 何も行いません。
//!
//! ## 使用例
//!
//! ```rust
//! use infilsim::scenario::MissionConfig;
//! use infilsim::simulation::MissionEngine;
//!
//! let mut engine = MissionEngine::new(MissionConfig::default(), 0);
//! engine.initialize().expect("初期化に失敗");
//! engine.step();
//! ```

use tracing::{debug, info, trace};

use crate::detection;
use crate::models::camera::Camera;
use crate::models::common::{Position2D, Rect};
use crate::models::concealment::{ConcealmentField, HidingSpot};
use crate::models::guard::Guard;
use crate::models::map::{Door, MissionMap};
use crate::models::noise;
use crate::models::operative::{AbilityKind, Operative};
use crate::scenario::MissionConfig;

/// 選択判定の半径
pub const SELECT_RADIUS: f64 = 16.0;
/// ウェイポイントの世界端マージン
pub const WAYPOINT_MARGIN: f64 = 20.0;
/// 捕捉判定距離（歩哨がこの距離未満に接近するとミッション失敗）
pub const CAPTURE_RADIUS: f64 = 14.0;
/// カメラ無効化アビリティの有効距離
pub const CAMERA_DISABLE_RANGE: f64 = 200.0;
/// ドア突破アビリティの有効距離
pub const DOOR_BREACH_RANGE: f64 = 80.0;
/// 低速モードの時間倍率
pub const SLOW_MOTION_SCALE: f64 = 0.3;
/// ヘッドレス実行の暴走防止ステップ上限
const MAX_STEPS: u64 = 100_000;

/// 世界状態
///
/// ミッション全体のフラグ類です。警報は粘着性で、一度立つとリセット
/// 以外では解除されません。勝利と敗北は相互排他で、どちらかが確定すると
/// 以降のティックは何も行いません。
#[derive(Debug, Clone)]
pub struct WorldState {
    pub width: f64,
    pub height: f64,
    pub paused: bool,
    /// 時間倍率（全時間依存量に一様に適用される）
    pub time_scale: f64,
    /// 警報フラグ（粘着性）
    pub alarm: bool,
    pub game_over: bool,
    pub game_won: bool,
}

impl WorldState {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            paused: false,
            time_scale: 1.0,
            alarm: false,
            game_over: false,
            game_won: false,
        }
    }

    /// ミッションの勝敗が確定しているかどうか
    pub fn is_decided(&self) -> bool {
        self.game_over || self.game_won
    }
}

/// ミッションエンジン
///
/// シミュレーションの全状態を所有するコンテキストオブジェクトです。
/// 入力コラボレータはコマンドメソッドを呼び、描画コラボレータは
/// 公開フィールドを読み取り専用で参照します。
pub struct MissionEngine {
    /// 経過シミュレーション時刻（秒）
    pub current_time: f64,
    /// 時間刻み（秒）
    pub dt: f64,
    /// ヘッドレス実行の最大時間（秒）
    pub max_time: f64,
    pub step_count: u64,

    pub world: WorldState,
    pub operatives: Vec<Operative>,
    pub guards: Vec<Guard>,
    pub cameras: Vec<Camera>,
    pub map: MissionMap,
    pub concealment: ConcealmentField,

    pub mission_config: MissionConfig,
    pub verbose_level: u8,
}

impl MissionEngine {
    pub fn new(config: MissionConfig, verbose_level: u8) -> Self {
        let dt = config.sim.dt_s;
        let max_time = config.sim.t_max_s;

        let obstacles = config
            .obstacles
            .iter()
            .map(|o| Rect::new(o.x, o.y, o.w, o.h))
            .collect();
        let doors = config
            .doors
            .iter()
            .map(|d| Door::new(d.id, Rect::new(d.x, d.y, d.w, d.h), d.open))
            .collect();
        let extraction = Rect::new(
            config.extraction_zone.x,
            config.extraction_zone.y,
            config.extraction_zone.w,
            config.extraction_zone.h,
        );
        let map = MissionMap::new(obstacles, doors, extraction);

        let hiding_spots = config
            .hiding_spots
            .iter()
            .map(|s| HidingSpot::new(Position2D::new(s.x, s.y), s.r))
            .collect();
        let concealment = ConcealmentField::new(hiding_spots);

        let world = WorldState::new(config.world.width, config.world.height);

        Self {
            current_time: 0.0,
            dt,
            max_time,
            step_count: 0,
            world,
            operatives: Vec::new(),
            guards: Vec::new(),
            cameras: Vec::new(),
            map,
            concealment,
            mission_config: config,
            verbose_level,
        }
    }

    pub fn initialize(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.mission_config.validate()?;

        if self.verbose_level > 0 {
            info!("ミッションエンジンを初期化中...");
        }

        self.initialize_operatives();
        self.initialize_guards();
        self.initialize_cameras();

        if self.verbose_level > 0 {
            info!("初期化完了:");
            info!("  工作員: {}名", self.operatives.len());
            info!("  歩哨: {}名", self.guards.len());
            info!("  監視カメラ: {}基", self.cameras.len());
        }

        Ok(())
    }

    fn initialize_operatives(&mut self) {
        for config in &self.mission_config.operatives {
            let mut operative = Operative::new(
                config.id,
                config.name.clone(),
                Position2D::new(config.pos.x, config.pos.y),
                config.speed,
                config.noise_radius,
                config.vision_radius,
                config.ability,
            );
            operative.selected = config.selected;

            if self.verbose_level > 1 {
                debug!(
                    "工作員初期化: {} ({}, 位置: {:.0}, {:.0})",
                    operative.name,
                    operative.ability.display_name(),
                    operative.position.x,
                    operative.position.y
                );
            }

            self.operatives.push(operative);
        }
    }

    fn initialize_guards(&mut self) {
        for config in &self.mission_config.guards {
            let patrol = config
                .patrol
                .iter()
                .map(|p| Position2D::new(p.x, p.y))
                .collect();
            let guard = Guard::new(
                config.id,
                Position2D::new(config.pos.x, config.pos.y),
                config.speed,
                config.range,
                config.fov_rad,
                config.direction_rad,
                patrol,
            );

            if self.verbose_level > 1 {
                debug!(
                    "歩哨初期化: {} (検知距離: {:.0}, 巡回点: {})",
                    guard.id,
                    guard.range,
                    guard.patrol.len()
                );
            }

            self.guards.push(guard);
        }
    }

    fn initialize_cameras(&mut self) {
        for config in &self.mission_config.cameras {
            let camera = Camera::new(
                config.id,
                Position2D::new(config.pos.x, config.pos.y),
                config.range,
                config.fov_rad,
                config.direction_rad,
            );

            if self.verbose_level > 1 {
                debug!("カメラ初期化: {} (検知距離: {:.0})", camera.id, camera.range);
            }

            self.cameras.push(camera);
        }
    }

    /// ヘッドレス実行
    ///
    /// 勝敗確定または最大時間到達までティックを進めます。
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        info!("=== ミッション実行開始 ===");

        while self.current_time < self.max_time && !self.world.is_decided() {
            self.step();

            if self.verbose_level > 2 {
                trace!("時刻: {:.1}秒 (ステップ: {})", self.current_time, self.step_count);
            }

            if self.step_count % 100 == 0 && self.verbose_level > 0 {
                let progress = (self.current_time / self.max_time) * 100.0;
                info!(
                    "進行状況: {:.1}% ({:.1}/{:.1}秒)",
                    progress, self.current_time, self.max_time
                );
            }

            if self.step_count > MAX_STEPS {
                break;
            }
        }

        info!("=== ミッション終了 ===");
        if self.world.game_won {
            info!("結果: 全工作員が脱出に成功");
        } else if self.world.game_over {
            info!("結果: 捕捉によりミッション失敗");
        } else {
            let alarm = if self.world.alarm { "発令" } else { "静穏" };
            info!("結果: 時間切れ (警報: {})", alarm);
        }
        info!("実行時間: {:.1}秒", self.current_time);
        info!("総ステップ数: {}", self.step_count);

        Ok(())
    }

    /// 固定時間刻みで1ステップ進める
    pub fn step(&mut self) {
        self.update(self.dt);
        self.current_time += self.dt;
        self.step_count += 1;
    }

    /// 1ティックの更新
    ///
    /// 経過時間には時間倍率が適用されます。一時停止中または勝敗確定後は
    /// 何も行いません（冪等なno-op）。
    pub fn update(&mut self, delta: f64) {
        if self.world.paused || self.world.is_decided() {
            return;
        }
        let dt = delta * self.world.time_scale;

        self.process_operatives(dt);
        self.process_guards(dt);
        self.process_cameras(dt);
        self.process_smoke(dt);
        self.process_detection();
        self.check_extraction();
        self.check_capture();
    }

    fn process_operatives(&mut self, dt: f64) {
        for i in 0..self.operatives.len() {
            let had_waypoint = self.operatives[i].advance(dt, &self.map);
            if had_waypoint && dt > 0.0 {
                // 移動中は基本騒音の一部を足音として毎ティック発する
                let amount = self.operatives[i].noise * noise::FOOTSTEP_NOISE_FACTOR;
                noise::emit_pulse(&mut self.operatives[i], amount, &mut self.guards);
            }
            self.operatives[i].tick_timers(dt);
        }
    }

    fn process_guards(&mut self, dt: f64) {
        let alarm = self.world.alarm;
        for guard in &mut self.guards {
            let alarm_target = if alarm {
                nearest_operative_position(&self.operatives, guard.position)
            } else {
                None
            };
            guard.update(dt, &self.map, alarm_target);
        }
    }

    fn process_cameras(&mut self, dt: f64) {
        for camera in &mut self.cameras {
            camera.tick(dt);
        }
    }

    fn process_smoke(&mut self, dt: f64) {
        self.concealment.tick(dt);
    }

    fn process_detection(&mut self) {
        let detected = detection::scan(
            &mut self.guards,
            &self.cameras,
            &self.operatives,
            &self.map,
            &self.concealment,
        );
        if detected && !self.world.alarm {
            info!("警報発令: 工作員が発見されました");
        }
        if detected {
            self.world.alarm = true;
        }
    }

    fn check_extraction(&mut self) {
        let all_extracted = self
            .operatives
            .iter()
            .all(|op| self.map.extraction_zone.contains(op.position));
        if all_extracted && !self.world.game_over {
            if !self.world.game_won {
                info!("ミッション達成: 全工作員が脱出しました");
            }
            self.world.game_won = true;
        }
    }

    fn check_capture(&mut self) {
        if self.world.is_decided() {
            return;
        }
        for guard in &self.guards {
            for operative in &self.operatives {
                if guard.position.distance_to(&operative.position) < CAPTURE_RADIUS {
                    info!(
                        "ミッション失敗: {}が歩哨{}に捕捉されました",
                        operative.name, guard.id
                    );
                    self.world.game_over = true;
                    return;
                }
            }
        }
    }

    /// 選択コマンド
    ///
    /// 判定半径内の工作員を選択します。`additive`がfalseの場合は先に
    /// 全選択を解除します。クリックされた工作員は常に選択状態になります
    /// （選択解除のトグルは行わない）。
    pub fn select_at(&mut self, point: Position2D, additive: bool) {
        let clicked = self
            .operatives
            .iter()
            .position(|op| op.position.distance_to(&point) < SELECT_RADIUS);
        if !additive {
            for operative in &mut self.operatives {
                operative.selected = false;
            }
        }
        if let Some(index) = clicked {
            self.operatives[index].selected = true;
        }
    }

    /// 移動コマンド
    ///
    /// 選択中の工作員がいなければ何もしません。指定位置にドアがある
    /// 場合はドアの開閉切り替えとして扱い、ウェイポイントは追加
    /// しません。`queued`がfalseの場合は既存のキューを消去してから
    /// 追加します。ウェイポイントは世界端マージン内にクランプされます。
    pub fn issue_move(&mut self, point: Position2D, queued: bool) {
        if !self.operatives.iter().any(|op| op.selected) {
            return;
        }
        if self.map.toggle_door_at(point) {
            return;
        }
        let clamped = Position2D::new(
            point.x.clamp(WAYPOINT_MARGIN, self.world.width - WAYPOINT_MARGIN),
            point.y.clamp(WAYPOINT_MARGIN, self.world.height - WAYPOINT_MARGIN),
        );
        for operative in self.operatives.iter_mut().filter(|op| op.selected) {
            if !queued {
                operative.queue.clear();
            }
            operative.queue.push_back(clamped);
        }
    }

    /// アビリティ実行コマンド
    ///
    /// 選択中の工作員のうち、スロットに対応するアビリティを所有し
    /// クールダウンが明けているものだけが実行します。所有しない工作員が
    /// 選択されていても何も起こりません（エラーではない）。煙幕は
    /// 無条件に、カメラ無効化とドア突破は成功時のみクールダウンを
    /// 開始します。
    pub fn use_ability(&mut self, slot: u8) {
        let Some(kind) = AbilityKind::from_slot(slot) else {
            return;
        };
        for i in 0..self.operatives.len() {
            {
                let operative = &self.operatives[i];
                if !operative.selected || !operative.ability_ready() || operative.ability != kind {
                    continue;
                }
            }
            match kind {
                AbilityKind::SmokeScreen => {
                    let position = self.operatives[i].position;
                    self.concealment.spawn_smoke(position);
                    self.operatives[i].ability_cooldown = kind.cooldown_s();
                    debug!("{}が煙幕を展開", self.operatives[i].name);
                }
                AbilityKind::DisableCamera => {
                    if self.disable_nearest_camera(i) {
                        self.operatives[i].ability_cooldown = kind.cooldown_s();
                    }
                }
                AbilityKind::BreachDoor => {
                    if self.breach_nearest_door(i) {
                        self.operatives[i].ability_cooldown = kind.cooldown_s();
                    }
                }
            }
        }
    }

    fn disable_nearest_camera(&mut self, operative_index: usize) -> bool {
        let position = self.operatives[operative_index].position;
        let mut closest: Option<(usize, f64)> = None;
        for (index, camera) in self.cameras.iter().enumerate() {
            let dist = position.distance_to(&camera.position);
            if closest.is_none_or(|(_, best)| dist < best) {
                closest = Some((index, dist));
            }
        }
        if let Some((index, dist)) = closest {
            if dist < CAMERA_DISABLE_RANGE {
                self.cameras[index].disable();
                debug!(
                    "{}がカメラ{}を無効化",
                    self.operatives[operative_index].name, self.cameras[index].id
                );
                return true;
            }
        }
        false
    }

    fn breach_nearest_door(&mut self, operative_index: usize) -> bool {
        let position = self.operatives[operative_index].position;
        if let Some((index, dist)) = self.map.nearest_door(position) {
            if dist < DOOR_BREACH_RANGE {
                self.map.doors[index].open = true;
                info!(
                    "{}がドア{}を突破",
                    self.operatives[operative_index].name, self.map.doors[index].id
                );
                noise::emit_pulse(
                    &mut self.operatives[operative_index],
                    noise::BREACH_NOISE_RADIUS,
                    &mut self.guards,
                );
                return true;
            }
        }
        false
    }

    /// 一時停止の切り替え
    pub fn toggle_paused(&mut self) {
        self.world.paused = !self.world.paused;
    }

    /// 低速モードの切り替え（修飾キー押下中のみ有効）
    pub fn set_slow_motion(&mut self, held: bool) {
        self.world.time_scale = if held { SLOW_MOTION_SCALE } else { 1.0 };
    }

    /// ミッションのリセット
    ///
    /// 工作員を初期位置へ戻し、キュー・クールダウン・警報・勝敗を
    /// 消去し、ドアと煙幕とカメラを初期状態へ復元します。歩哨は巡回
    /// 状態へ戻りますが、現在位置は維持されます。
    pub fn reset(&mut self) {
        self.world.alarm = false;
        self.world.game_over = false;
        self.world.game_won = false;
        self.current_time = 0.0;
        self.step_count = 0;

        for operative in &mut self.operatives {
            operative.reset();
        }
        self.map.reset_doors();
        self.concealment.clear_smoke();
        for camera in &mut self.cameras {
            camera.disabled_timer = 0.0;
        }
        for guard in &mut self.guards {
            guard.reset();
        }

        info!("ミッションをリセットしました");
    }
}

/// 指定位置に最も近い工作員の位置を取得
fn nearest_operative_position(operatives: &[Operative], from: Position2D) -> Option<Position2D> {
    let mut closest: Option<(f64, Position2D)> = None;
    for operative in operatives {
        let dist = from.distance_to(&operative.position);
        if closest.is_none_or(|(best, _)| dist < best) {
            closest = Some((dist, operative.position));
        }
    }
    closest.map(|(_, position)| position)
}
