use tracing::trace;

use crate::models::guard::Guard;
use crate::models::operative::{NoisePulse, Operative};

/// 足音の騒音係数（移動中の自動パルスは基本騒音半径のこの割合）
pub const FOOTSTEP_NOISE_FACTOR: f64 = 0.3;
/// ドア突破時の騒音半径
pub const BREACH_NOISE_RADIUS: f64 = 180.0;
/// パルス表示の持続時間（秒）
pub const PULSE_DURATION_S: f64 = 0.5;

/// 騒音パルスを発生させる
///
/// 工作員に表示用パルスを記録し（既存パルスは上書き）、発生位置から
/// `amount`以内にいる全歩哨を即座に調査状態へ遷移させます。伝播する
/// 波ではなく瞬時の半径判定です。
pub fn emit_pulse(operative: &mut Operative, amount: f64, guards: &mut [Guard]) {
    operative.noise_pulse = Some(NoisePulse {
        radius: amount,
        timer: PULSE_DURATION_S,
    });
    let origin = operative.position;
    for guard in guards.iter_mut() {
        if guard.position.distance_to(&origin) <= amount {
            trace!(
                "歩哨{}が騒音を検知 (発生源: {}, 半径: {:.0})",
                guard.id, operative.name, amount
            );
            guard.hear_noise(origin);
        }
    }
}

/// 工作員の基本騒音半径でパルスを発生させる
pub fn emit_base_pulse(operative: &mut Operative, guards: &mut [Guard]) {
    let amount = operative.noise;
    emit_pulse(operative, amount, guards);
}
