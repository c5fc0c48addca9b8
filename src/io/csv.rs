/*!
# I/O Utilities for Saving Traces to CSV

This module provides a function to save sampled traces to a CSV file. Enable
via the `csv` feature. Nothing in the sampling core depends on it.
*/

use ndarray::Array2;
use std::error::Error;
use std::fs::File;

use csv::Writer;

/**
Saves a stacked multi-chain trace as a CSV file.

`traces` is expected in **chain × draw** layout, as returned by
[`ChainRunner::run`](crate::core::ChainRunner::run). The resulting file has a
`chain,draw,mu` header and one row per draw; draw `0` of each chain is the
chain's initial value.

# Arguments

* `traces` - The stacked traces, one row per chain.
* `filename` - The file path where the CSV data will be written.

# Returns

Returns `Ok(())` if successful, or an error if any I/O or CSV formatting
issue occurs.

# Examples

```rust
use mu_mcmc::io::csv::save_csv;
use ndarray::arr2;

let traces = arr2(&[[0.0, 0.5, 0.5], [0.0, -0.25, 0.1]]);

save_csv(&traces, "/tmp/trace.csv").expect("Expecting saving traces to succeed");
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/
pub fn save_csv<T: std::fmt::Display>(
    traces: &Array2<T>,
    filename: &str,
) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_writer(File::create(filename)?);
    wtr.write_record(["chain", "draw", "mu"])?;

    for (chain_idx, chain) in traces.outer_iter().enumerate() {
        for (draw_idx, value) in chain.iter().enumerate() {
            wtr.write_record(&[
                chain_idx.to_string(),
                draw_idx.to_string(),
                value.to_string(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;
    use std::fs;
    use tempfile::NamedTempFile;

    /// Saving zero chains still produces the header row.
    #[test]
    fn test_save_csv_empty_data() {
        let traces = Array2::<f64>::zeros((0, 0));
        let file = NamedTempFile::new().expect("Could not create temp file");
        let filename = file.path().to_str().unwrap();

        let result = save_csv(&traces, filename);
        assert!(
            result.is_ok(),
            "Saving empty traces to CSV failed: {:?}",
            result
        );

        let contents = fs::read_to_string(filename).unwrap();
        assert_eq!(contents.trim(), "chain,draw,mu");
    }

    #[test]
    fn test_save_csv_single_chain_single_draw() {
        let traces = arr2(&[[42.0]]);
        let file = NamedTempFile::new().expect("Could not create temp file");
        let filename = file.path().to_str().unwrap();

        let result = save_csv(&traces, filename);
        assert!(
            result.is_ok(),
            "Saving a single draw to CSV failed: {:?}",
            result
        );

        let contents = fs::read_to_string(filename).unwrap();
        let expected = "chain,draw,mu\n0,0,42";
        assert_eq!(contents.trim(), expected);
    }

    #[test]
    fn test_save_csv_multi_chain() {
        let traces = arr2(&[[1.0, 2.0], [10.0, 20.0]]);
        let file = NamedTempFile::new().expect("Could not create temp file");
        let filename = file.path().to_str().unwrap();

        let result = save_csv(&traces, filename);
        assert!(result.is_ok());

        let contents = fs::read_to_string(filename).unwrap();
        let expected = "\
chain,draw,mu
0,0,1
0,1,2
1,0,10
1,1,20";
        assert_eq!(contents.trim(), expected);
    }
}
