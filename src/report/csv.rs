use super::{HeaderStyle, MetricRecord};
use std::io::Write;

/// Header row followed by exactly one data row.
///
/// Fields are quoted only when they hold a separator, a quote or a line break.
pub fn write_csv<W: Write>(
    writer: W,
    record: &MetricRecord,
    style: HeaderStyle,
) -> Result<(), ::csv::Error> {
    let mut csv_writer = ::csv::WriterBuilder::new()
        .quote_style(::csv::QuoteStyle::Necessary)
        .from_writer(writer);
    csv_writer.write_record(style.headers())?;
    csv_writer.write_record(record.values())?;
    csv_writer.flush()?;
    Ok(())
}

pub fn to_csv_string(
    record: &MetricRecord,
    style: HeaderStyle,
) -> Result<String, ::csv::Error> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, record, style)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_record;

    #[test]
    fn test_one_header_and_one_row() {
        let text = to_csv_string(&sample_record(), HeaderStyle::Short).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Subject,Acq,Method,CC,SSIM,MSE,NCC,NMI,Masked");
        assert_eq!(
            lines[1],
            "sub-01_T2w.nii.gz,T2w,ANTS_syn,0.9,1.0,0.0125,0.9,NaN,True"
        );
    }

    #[test]
    fn test_labels_with_commas_are_quoted() {
        let mut record = sample_record();
        record.method = "ANTS_syn, 3 levels".to_string();
        let text = to_csv_string(&record, HeaderStyle::Short).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.contains("\"ANTS_syn, 3 levels\""));

        record.method = "say \"hi\"".to_string();
        let text = to_csv_string(&record, HeaderStyle::Short).unwrap();
        assert!(text.contains("\"say \"\"hi\"\"\""));
    }

    #[test]
    fn test_descriptive_headers() {
        let text = to_csv_string(&sample_record(), HeaderStyle::Descriptive).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.starts_with("Subject,Acq,Method,Cross-Correlation Index (CC - Opt.val: 1),"));
        assert!(header.ends_with(",Masked"));
    }
}
