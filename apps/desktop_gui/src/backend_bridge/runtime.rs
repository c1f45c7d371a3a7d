//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{run_pipeline, ClientSettings, HttpAnalysisService, WorkflowUpdate};
use crossbeam_channel::{Receiver, Sender};
use url::Url;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{ImageLoad, PreviewImage, UiError, UiErrorContext, UiEvent};

const MAX_PREVIEW_DIMENSION: u32 = 1024;

pub fn launch(settings: ClientSettings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        let service = match HttpAnalysisService::from_settings(&settings) {
            Ok(service) => Arc::new(service),
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: {err}"),
                )));
                tracing::error!("failed to build analysis service client: {err}");
                return;
            }
        };
        tracing::info!(
            service_url = %service.endpoint().base(),
            timeout_secs = ?settings.request_timeout_secs,
            "backend worker ready"
        );
        let _ = ui_tx.try_send(UiEvent::Info("Ready".to_string()));

        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Submit(ticket) => {
                        let service = Arc::clone(&service);
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            run_pipeline(service.as_ref(), ticket, |update| {
                                forward_update(&ui_tx, update)
                            })
                            .await;
                        });
                    }
                    BackendCommand::FetchImage { generation, url } => {
                        let service = Arc::clone(&service);
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let outcome = fetch_preview(&service, &url).await;
                            if let Err(err) = &outcome {
                                tracing::warn!(generation, url = %url, "result image unavailable: {err}");
                            }
                            let load = ImageLoad {
                                generation,
                                url,
                                outcome,
                            };
                            if !deliver(&ui_tx, UiEvent::Image(load)) {
                                tracing::debug!(generation, "ui event queue closed; dropping image");
                            }
                        });
                    }
                }
            }
            tracing::debug!("ui command queue closed; backend worker exiting");
        });
    });
}

fn forward_update(ui_tx: &Sender<UiEvent>, update: WorkflowUpdate) {
    let generation = update.generation;
    if !deliver(ui_tx, UiEvent::Workflow(update)) {
        tracing::debug!(generation, "ui event queue closed; dropping workflow update");
    }
}

/// Waits for room on the UI queue rather than dropping the event. The wait
/// happens in `block_in_place` so other tasks keep running on this runtime.
/// Returns false once the UI side is gone.
fn deliver(ui_tx: &Sender<UiEvent>, event: UiEvent) -> bool {
    tokio::task::block_in_place(|| ui_tx.send(event)).is_ok()
}

async fn fetch_preview(service: &HttpAnalysisService, url: &Url) -> Result<PreviewImage, String> {
    let bytes = service
        .fetch_image(url)
        .await
        .map_err(|err| err.to_string())?;
    tokio::task::spawn_blocking(move || decode_preview_image(&bytes))
        .await
        .map_err(|err| format!("image decode task failed: {err}"))?
}

fn decode_preview_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let resized = dynamic
        .thumbnail(MAX_PREVIEW_DIMENSION, MAX_PREVIEW_DIMENSION)
        .to_rgba8();
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    Ok(PreviewImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::{decode_preview_image, forward_update};
    use crate::controller::events::UiEvent;
    use client_core::{WorkflowEvent, WorkflowUpdate};
    use crossbeam_channel::bounded;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let pixels = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 255]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(pixels)
            .write_to(&mut out, image::ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    #[test]
    fn decodes_png_into_rgba_pixels() {
        let preview = decode_preview_image(&png_bytes(4, 2)).expect("decode");

        assert_eq!((preview.width, preview.height), (4, 2));
        assert_eq!(preview.rgba.len(), 4 * 2 * 4);
        assert_eq!(&preview.rgba[..4], &[200, 40, 40, 255]);
    }

    #[test]
    fn large_images_are_scaled_to_fit_preview() {
        let preview = decode_preview_image(&png_bytes(2048, 512)).expect("decode");

        assert_eq!((preview.width, preview.height), (1024, 256));
    }

    #[test]
    fn non_image_bytes_are_an_error() {
        assert!(decode_preview_image(b"not an image").is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn full_ui_queue_delays_updates_instead_of_dropping_them() {
        let (ui_tx, ui_rx) = bounded(1);
        ui_tx
            .send(UiEvent::Info("queued first".to_string()))
            .expect("fill queue");

        let sender = tokio::spawn(async move {
            forward_update(
                &ui_tx,
                WorkflowUpdate {
                    generation: 3,
                    event: WorkflowEvent::UploadFailed,
                },
            );
        });
        let reader = std::thread::spawn(move || {
            let first = ui_rx.recv().expect("first event");
            let second = ui_rx.recv().expect("second event");
            (first, second)
        });

        sender.await.expect("sender task");
        let (first, second) = reader.join().expect("reader thread");
        assert!(matches!(first, UiEvent::Info(text) if text == "queued first"));
        assert!(matches!(
            second,
            UiEvent::Workflow(WorkflowUpdate {
                generation: 3,
                event: WorkflowEvent::UploadFailed,
            })
        ));
    }

    #[test]
    fn closed_ui_queue_drops_update_quietly() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .build()
            .expect("runtime");
        let (ui_tx, ui_rx) = bounded::<UiEvent>(1);
        drop(ui_rx);

        runtime.block_on(async move {
            tokio::spawn(async move {
                forward_update(
                    &ui_tx,
                    WorkflowUpdate {
                        generation: 1,
                        event: WorkflowEvent::AnalysisFailed,
                    },
                );
            })
            .await
            .expect("sender task");
        });
    }
}
