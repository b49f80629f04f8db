/// A text with a known class, consumed by the training batcher
pub trait Item: Clone + Send + Sync + std::fmt::Debug + 'static {
    /// The text for classification
    fn input(&self) -> &str;

    /// The class index of the text
    fn class_id(&self) -> usize;
}
