use crate::runner::traits::{RunError, Runner};

/// Run the now-validated executable over every hidden input, in index
/// order, capturing one output per input. Unlike the sample loop there is
/// no retry path: any failure here aborts the process.
pub async fn run_hidden_inputs(
    inputs: &[Vec<u8>],
    runner: &dyn Runner,
) -> Result<Vec<Vec<u8>>, RunError> {
    tracing::info!("processing {} inputs", inputs.len());
    let mut outputs = Vec::with_capacity(inputs.len());
    for (index, input) in inputs.iter().enumerate() {
        let stdout = runner.run(input).await.map_err(|err| {
            tracing::error!("execution failed in input {}: {}", index + 1, err);
            err
        })?;
        outputs.push(stdout);
    }
    Ok(outputs)
}
