use std::convert::Infallible;

use axum::{
    extract::{Extension, Path},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{
    future,
    stream::{self, Stream, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    api::DynAPI,
    engine::realtime::watch_changes,
    entities::{RecordKind, Snapshot},
    error::Error,
};

/// Current list of `kind`, then the full list again after every change.
/// The watch is dropped together with the stream when the client leaves.
pub async fn listen(
    Extension(api): Extension<DynAPI>,
    Path(kind): Path<RecordKind>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, Error> {
    let changes = api.subscribe();
    let initial = api.snapshot(kind).await?;

    let (sender, receiver) = mpsc::unbounded_channel();
    let subscription = watch_changes(api, changes, kind, move |snapshot| {
        let _ = sender.send(snapshot);
    });

    let updates = stream::unfold(
        (receiver, subscription),
        |(mut receiver, subscription)| async move {
            let snapshot = receiver.recv().await?;
            Some((snapshot, (receiver, subscription)))
        },
    );

    let events = stream::once(future::ready(initial))
        .chain(updates)
        .map(move |snapshot| Ok(to_event(kind, &snapshot)));

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

fn to_event(kind: RecordKind, snapshot: &Snapshot) -> Event {
    match Event::default().event(kind.name()).json_data(snapshot) {
        Ok(event) => event,
        Err(err) => {
            tracing::warn!(%kind, error = %err, "could not encode snapshot");
            Event::default().comment("encoding failed")
        }
    }
}
