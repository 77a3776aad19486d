use std::ops::{Add, Mul, Sub};

/// 2次元位置を表す構造体
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position2D {
    pub x: f64,
    pub y: f64,
}

impl Position2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 2点間のユークリッド距離を計算
    pub fn distance_to(&self, other: &Position2D) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// ベクトルの長さ（原点からの距離）
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// この点から見た相手の方位角（ラジアン）
    pub fn angle_to(&self, other: &Position2D) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }
}

impl Add for Position2D {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Position2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Position2D {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self::Output {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

/// 軸平行矩形を表す構造体
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// 点の包含判定（境界を含む）
    pub fn contains(&self, point: Position2D) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.w
            && point.y >= self.y
            && point.y <= self.y + self.h
    }

    /// 矩形の原点（左上隅）
    pub fn origin(&self) -> Position2D {
        Position2D::new(self.x, self.y)
    }

    /// 矩形の中心点
    pub fn center(&self) -> Position2D {
        Position2D::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// 幾何ユーティリティ関数
pub mod math_utils {
    use super::{Position2D, Rect};

    /// 線分サンプリングの分割数
    ///
    /// 線分と矩形の交差判定は連続的な交差計算ではなく、この分割数での
    /// 離散サンプリング近似で行います。サンプル間で矩形の角をかすめる
    /// 線分は検出されないことがあり、これは遠距離での検知挙動に影響する
    /// 意図的な近似です。変更する場合は検知挙動の変化として扱うこと。
    pub const SEGMENT_SAMPLE_STEPS: u32 = 12;

    /// 角度を(-π, π]の範囲に正規化
    ///
    /// ±πの分岐点での巻き戻り誤差を避けるため、剰余演算ではなく
    /// atan2(sin, cos)で正規化します。
    pub fn normalize_angle(angle: f64) -> f64 {
        angle.sin().atan2(angle.cos())
    }

    /// 視野判定
    ///
    /// 対象が検知距離`range`以内にあり、かつ観測者から対象への方位角と
    /// 向き`direction`の差（正規化済み）の絶対値が視野全角`fov`の半分
    /// 未満である場合にtrueを返します。
    pub fn within_fov(
        observer: Position2D,
        target: Position2D,
        range: f64,
        fov: f64,
        direction: f64,
    ) -> bool {
        let dx = target.x - observer.x;
        let dy = target.y - observer.y;
        let dist = dx.hypot(dy);
        if dist > range {
            return false;
        }
        let angle = dy.atan2(dx);
        let delta = normalize_angle(angle - direction);
        delta.abs() < fov / 2.0
    }

    /// 線分と矩形の交差判定（離散サンプリング近似）
    ///
    /// 線分a→bを`SEGMENT_SAMPLE_STEPS`分割で補間し、各サンプル点の
    /// 矩形包含を判定します。
    pub fn segment_intersects_rect(a: Position2D, b: Position2D, rect: &Rect) -> bool {
        for i in 0..=SEGMENT_SAMPLE_STEPS {
            let t = f64::from(i) / f64::from(SEGMENT_SAMPLE_STEPS);
            let sample = Position2D::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
            if rect.contains(sample) {
                return true;
            }
        }
        false
    }
}
