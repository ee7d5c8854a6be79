use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// UUIDをラップした識別子型を定義する
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn value(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

define_id!(
    /// レンタルID - レンタル管理コンテキストの集約ID
    RentalId
);

define_id!(
    /// 機材ID - 機材在庫コンテキストへの参照
    EquipmentId
);

define_id!(
    /// 農家ID - 申請者（ユーザー管理コンテキストへの参照）
    FarmerId
);

define_id!(
    /// 管理者ID - 承認・却下・完了を行う管理者
    AdminId
);

/// 数量エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    /// 数量は1以上でなければならない
    #[error("Quantity must be at least 1")]
    Zero,
}

/// レンタル数量
///
/// 不変条件：1以上（正の整数）
/// 0台のレンタル申請を型で排除する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub fn new(value: u32) -> Result<Self, QuantityError> {
        if value == 0 {
            return Err(QuantityError::Zero);
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

/// レンタルのステータス
///
/// 状態遷移: (none) → pending → {approved → completed} | rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalStatus {
    /// 承認待ち
    Pending,
    /// 承認済み
    Approved,
    /// 却下
    Rejected,
    /// 完了（返却済み）
    Completed,
}

impl RentalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentalStatus::Pending => "pending",
            RentalStatus::Approved => "approved",
            RentalStatus::Rejected => "rejected",
            RentalStatus::Completed => "completed",
        }
    }

    /// 在庫の空き判定で予約として数えるか
    ///
    /// 承認待ちも承認済みと同様に日程を塞ぐ。
    pub fn blocks_availability(&self) -> bool {
        matches!(self, RentalStatus::Pending | RentalStatus::Approved)
    }
}

impl std::fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RentalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RentalStatus::Pending),
            "approved" => Ok(RentalStatus::Approved),
            "rejected" => Ok(RentalStatus::Rejected),
            "completed" => Ok(RentalStatus::Completed),
            _ => Err(format!("Invalid rental status: {}", s)),
        }
    }
}

/// レンタル期間（開始日・終了日ともに含む）
///
/// 不変条件：end >= start
/// 検証済みの期間のみがこの型で表現される。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl RentalPeriod {
    /// 終了日が開始日より前の場合は`None`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        if end < start {
            return None;
        }
        Some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// 両端を含む日数（1日レンタルは1）
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// 期間内の各日を順に返す
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}
