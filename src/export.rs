use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::stats::AggregateReport;

#[must_use]
pub fn report_headers(extension_filter: Option<&str>) -> [String; 5] {
    let kind = extension_filter.map_or_else(|| "Files".to_string(), |ext| format!("{ext} Files"));
    [
        "Subfolder".to_string(),
        format!("Number of {kind} > 0 bytes"),
        format!("Number of 0 Byte {kind}"),
        "Total Size (MB)".to_string(),
        "Total Duration (seconds)".to_string(),
    ]
}

pub fn write_report<W: Write>(report: &AggregateReport, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(report_headers(report.extension_filter()))?;
    for row in report.rows() {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_report<P: AsRef<Path>>(report: &AggregateReport, path: P) -> Result<()> {
    let path = path.as_ref();
    write_report(report, File::create(path)?)?;
    info!("Summary saved to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::FolderStats;

    fn render(report: &AggregateReport) -> String {
        let mut buf = Vec::new();
        write_report(report, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn headers_name_the_filter() {
        let plain = report_headers(None);
        assert_eq!(plain[1], "Number of Files > 0 bytes");
        assert_eq!(plain[2], "Number of 0 Byte Files");

        let wav = report_headers(Some(".wav"));
        assert_eq!(wav[1], "Number of .wav Files > 0 bytes");
        assert_eq!(wav[2], "Number of 0 Byte .wav Files");
    }

    #[test]
    fn writes_folder_rows_then_total() {
        let folder = FolderStats {
            name: "Site, A".to_string(),
            non_empty_file_count: 2,
            empty_file_count: 1,
            total_size_bytes: 1_048_576,
            total_duration_seconds: 5.0,
        };
        let report = AggregateReport::new(vec![folder], Vec::new(), None);

        let out = render(&report);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Subfolder,Number of Files > 0 bytes,Number of 0 Byte Files,Total Size (MB),Total Duration (seconds)"
        );
        assert_eq!(lines[1], "\"Site, A\",2,1,1.0,5.0");
        assert_eq!(lines[2], "Total,2,1,1.0,5.0");
    }

    #[test]
    fn export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("summary.csv");
        let report = AggregateReport::new(Vec::new(), Vec::new(), Some(".wav".to_string()));

        export_report(&report, &out).unwrap();

        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("Subfolder,Number of .wav Files > 0 bytes,"));
        assert!(text.ends_with("Total,0,0,0.0,0.0\n"));
    }
}
