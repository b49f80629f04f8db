use burn::train::renderer::{MetricState, MetricsRenderer, TrainingProgress};
use derive_new::new;

/// Reports training progress through the log facade instead of a terminal UI
#[derive(new)]
pub struct Logged {}

impl MetricsRenderer for Logged {
    fn update_train(&mut self, _state: MetricState) {}

    fn update_valid(&mut self, _state: MetricState) {}

    fn render_train(&mut self, item: TrainingProgress) {
        log::debug!(
            "train epoch {}/{}: {}/{} items",
            item.epoch,
            item.epoch_total,
            item.progress.items_processed,
            item.progress.items_total
        );
    }

    fn render_valid(&mut self, item: TrainingProgress) {
        log::debug!(
            "valid epoch {}/{}: {}/{} items",
            item.epoch,
            item.epoch_total,
            item.progress.items_processed,
            item.progress.items_total
        );
    }
}
