use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{EntityTrait, Set};

use wordless_core::error::RepoError;
use wordless_core::ports::SettingsRepository;

use super::base::{SeaRepository, query_error};
use super::entity::setting::{self, Entity as SettingEntity};

/// SeaORM key/value settings repository.
pub type SeaSettingsRepository = SeaRepository<SettingEntity>;

fn active_setting(key: &str, value: Option<&str>) -> setting::ActiveModel {
    setting::ActiveModel {
        key: Set(key.to_string()),
        value: Set(value.map(str::to_string)),
    }
}

#[async_trait]
impl SettingsRepository for SeaSettingsRepository {
    async fn get(&self, key: &str) -> Result<Option<String>, RepoError> {
        let result = SettingEntity::find_by_id(key.to_string())
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.and_then(|setting| setting.value))
    }

    async fn insert_if_absent(&self, key: &str, value: Option<&str>) -> Result<bool, RepoError> {
        let inserted = SettingEntity::insert(active_setting(key, value))
            .on_conflict(
                OnConflict::column(setting::Column::Key)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(query_error)?;

        Ok(inserted > 0)
    }

    async fn set(&self, key: &str, value: Option<&str>) -> Result<(), RepoError> {
        SettingEntity::insert(active_setting(key, value))
            .on_conflict(
                OnConflict::column(setting::Column::Key)
                    .update_column(setting::Column::Value)
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(query_error)?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), RepoError> {
        SettingEntity::delete_by_id(key.to_string())
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        Ok(())
    }
}
