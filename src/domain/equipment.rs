use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::EquipmentId;

/// 機材定義のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EquipmentError {
    #[error("Daily rate must not be negative")]
    NegativeDailyRate,
    #[error("Equipment name must not be empty")]
    EmptyName,
}

/// 機材 - レンタル対象の在庫品目
///
/// quantity_availableは在庫総数であり、予約ごとの残数ではない。
/// u32で保持するため quantity_available >= 0 は型で保証される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub equipment_id: EquipmentId,
    pub name: String,
    /// 1日あたりのレンタル料金
    pub daily_rate: Decimal,
    pub quantity_available: u32,
}

impl Equipment {
    pub fn new(
        equipment_id: EquipmentId,
        name: impl Into<String>,
        daily_rate: Decimal,
        quantity_available: u32,
    ) -> Result<Self, EquipmentError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(EquipmentError::EmptyName);
        }
        if daily_rate < Decimal::ZERO {
            return Err(EquipmentError::NegativeDailyRate);
        }

        Ok(Self {
            equipment_id,
            name,
            daily_rate,
            quantity_available,
        })
    }
}
