pub mod calendar;
pub mod coach;
pub mod cycle;
pub mod events;
pub mod goals;
pub mod weeks;

use catalyst_core::cycle::Cycle;
use catalyst_core::error::CatalystError;

use crate::error::AppError;
use crate::state::AppState;

/// Committed cycle, or 404 when none has been initialized.
pub(crate) fn snapshot(app: &AppState) -> Result<Cycle, AppError> {
    app.store
        .get()
        .ok_or_else(|| AppError(CatalystError::NoCycle.into()))
}

/// Apply `edit` through the store and return its output together with the
/// cycle exactly as committed.
pub(crate) fn commit<T, F>(app: &AppState, edit: F) -> Result<(T, Cycle), AppError>
where
    F: FnOnce(&mut Cycle) -> catalyst_core::Result<T>,
{
    let result = app.store.apply(|c| {
        let out = edit(c)?;
        Ok((out, c.clone()))
    })?;
    Ok(result)
}
