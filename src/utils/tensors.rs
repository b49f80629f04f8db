use burn::tensor::{backend::Backend, Data, ElementConversion, Int, Shape, Tensor};

/// Build a `[rows, width]` index tensor from rows that are already padded to `width`
pub fn index_matrix<B: Backend>(
    rows: Vec<Vec<usize>>,
    width: usize,
    device: &B::Device,
) -> Tensor<B, 2, Int> {
    let batch_size = rows.len();

    let values: Vec<B::IntElem> = rows
        .into_iter()
        .flat_map(|row| {
            debug_assert_eq!(row.len(), width);
            row.into_iter()
        })
        .map(|index| (index as i64).elem())
        .collect();

    Tensor::from_data(Data::new(values, Shape::new([batch_size, width])), device)
}

/// Build a 1-D index tensor
pub fn index_vector<B: Backend>(indices: Vec<usize>, device: &B::Device) -> Tensor<B, 1, Int> {
    let len = indices.len();

    let values: Vec<B::IntElem> = indices
        .into_iter()
        .map(|index| (index as i64).elem())
        .collect();

    Tensor::from_data(Data::new(values, Shape::new([len])), device)
}
