use crate::domain::{Equipment, EquipmentId, FarmerId, commands::*};

use super::errors::{RentalApplicationError, Result};
use super::rental_service::ServiceDependencies;

/// 機材を登録する
///
/// IDはここで採番する。名前は前後の空白を除いて保存される。
pub async fn register_equipment(
    deps: &ServiceDependencies,
    cmd: RegisterEquipment,
) -> Result<Equipment> {
    let equipment = Equipment::new(
        EquipmentId::new(),
        cmd.name,
        cmd.daily_rate,
        cmd.quantity_available,
    )?;

    deps.equipment_catalog
        .save(equipment.clone())
        .await
        .map_err(RentalApplicationError::EquipmentCatalogError)?;

    tracing::info!(
        equipment_id = %equipment.equipment_id.value(),
        name = %equipment.name,
        "Equipment registered"
    );
    Ok(equipment)
}

/// 機材の定義を置き換える
///
/// 在庫総数を減らしても既存の予約は取り消されない。
/// 以降の申請と承認時の再確認が新しい値で判定される。
pub async fn update_equipment(
    deps: &ServiceDependencies,
    cmd: UpdateEquipment,
) -> Result<Equipment> {
    let existing = deps
        .equipment_catalog
        .find_by_id(cmd.equipment_id)
        .await
        .map_err(RentalApplicationError::EquipmentCatalogError)?;

    if existing.is_none() {
        return Err(RentalApplicationError::EquipmentNotFound);
    }

    let equipment = Equipment::new(
        cmd.equipment_id,
        cmd.name,
        cmd.daily_rate,
        cmd.quantity_available,
    )?;

    deps.equipment_catalog
        .save(equipment.clone())
        .await
        .map_err(RentalApplicationError::EquipmentCatalogError)?;

    tracing::info!(equipment_id = %equipment.equipment_id.value(), "Equipment updated");
    Ok(equipment)
}

/// 農家を未承認の状態で登録する
pub async fn register_farmer(deps: &ServiceDependencies) -> Result<FarmerId> {
    let farmer_id = FarmerId::new();

    deps.farmer_directory
        .register(farmer_id)
        .await
        .map_err(RentalApplicationError::FarmerDirectoryError)?;

    tracing::info!(farmer_id = %farmer_id.value(), "Farmer registered, awaiting approval");
    Ok(farmer_id)
}

/// 農家アカウントを承認する
///
/// 承認済みの農家を再度承認しても成功する。
pub async fn approve_farmer(deps: &ServiceDependencies, cmd: ApproveFarmer) -> Result<()> {
    let found = deps
        .farmer_directory
        .approve(cmd.farmer_id)
        .await
        .map_err(RentalApplicationError::FarmerDirectoryError)?;

    if !found {
        return Err(RentalApplicationError::FarmerNotFound);
    }

    tracing::info!(
        farmer_id = %cmd.farmer_id.value(),
        admin_id = %cmd.admin_id.value(),
        "Farmer approved"
    );
    Ok(())
}
