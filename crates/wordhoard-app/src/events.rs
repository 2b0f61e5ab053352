use kanal::{AsyncReceiver, AsyncSender};
use tokio_util::sync::CancellationToken;
use wordhoard_highlight::SelectionSnapshot;
use wordhoard_types::AppEvent;

use crate::content::ContentSession;

/// Page-side main loop: drives the selection, translate and highlight
/// flows from page events, sending tooltip events back out. Runs until
/// cancelled (page unload) or a channel closes.
pub async fn event_loop(
    mut session: ContentSession,
    page_rx: AsyncReceiver<AppEvent>,
    page_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    session.resync().await?;
    tracing::info!("content loop started");

    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("content loop shutting down");
                return Ok(());
            }
            event = page_rx.recv() => event?,
        };
        if let Some(tooltip) = handle_event(&mut session, event).await? {
            page_tx.send(AppEvent::ShowTooltip(tooltip)).await?;
        }
    }
}

async fn handle_event(
    session: &mut ContentSession,
    event: AppEvent,
) -> anyhow::Result<Option<wordhoard_types::TooltipData>> {
    match event {
        AppEvent::SelectionCaptured(text) => {
            let snapshot = SelectionSnapshot {
                text,
                inside_single_marker: false,
            };
            session.offer_selection(&snapshot);
        }
        AppEvent::ConfirmTranslate { editable_focused } => {
            return Ok(session.confirm_translate(editable_focused).await?);
        }
        AppEvent::CancelSelection => session.cancel_selection(),
        AppEvent::MarkerClicked(id) => {
            return Ok(session.marker_clicked(id).await?);
        }
        AppEvent::VocabularyChanged => {
            let markers = session.resync().await?;
            tracing::debug!(markers, "rescan after external change");
        }
        AppEvent::ShowTooltip(_) => {
            // Outbound only.
        }
    }
    Ok(None)
}
