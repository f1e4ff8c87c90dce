//! Host loop that refreshes an archive whenever its inputs change.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use super::CollectionArchive;
use crate::filter::FilterHandle;

/// Refresh `archive` once, then again on every filter or page change.
///
/// Each refresh runs on its own task so that a change arriving while a
/// request is in flight reaches the archive immediately (and supersedes the
/// outstanding request). Returns when the filter provider is dropped.
pub async fn drive(archive: Arc<CollectionArchive>, mut filters: FilterHandle) {
    let mut pages = archive.subscribe_page();
    pages.borrow_and_update();

    spawn_refresh(&archive, &mut filters);

    loop {
        tokio::select! {
            open = filters.changed() => {
                if !open {
                    debug!("Filter provider closed, stopping archive driver");
                    break;
                }
            }
            changed = pages.changed() => {
                if changed.is_err() {
                    break;
                }
                pages.borrow_and_update();
            }
        }
        spawn_refresh(&archive, &mut filters);
    }
}

/// Spawn one refresh. The filter state is read when the task runs, so a
/// change published in between is not lost to a stale copy.
fn spawn_refresh(
    archive: &Arc<CollectionArchive>,
    filters: &mut FilterHandle,
) -> JoinHandle<()> {
    filters.mark_seen();
    let filters = filters.clone();
    let archive = Arc::clone(archive);
    tokio::spawn(async move {
        let outcome = archive.refresh(&filters.current()).await;
        debug!(?outcome, page = archive.page(), "Archive refreshed");
    })
}
