use crate::{
    errors::{ApiError, ApiResult},
    forms::GroupForm,
    models::Group,
    store::Store,
};
use tracing::info;

pub fn create_group(store: &Store, form: GroupForm) -> ApiResult<Group> {
    let form = form.clean()?;
    let group = store
        .insert_group(form.title, form.slug, form.description)
        .ok_or(ApiError::AlreadyExists("Group"))?;

    info!("Group created: {} ({})", group.slug, group.id);

    Ok(group)
}
