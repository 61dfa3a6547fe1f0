use crate::api::RunReport;
use std::fmt;

/// Text report formatter for a finished run
pub struct TextReport<'a> {
    report: &'a RunReport,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(report: &'a RunReport) -> Self {
        Self { report }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DICOM Merge Report")?;
        writeln!(f, "==================")?;
        writeln!(f)?;
        writeln!(f, "Root:           {}", self.report.root.display())?;
        writeln!(f, "Output:         {}", self.report.destination.display())?;
        writeln!(f, "Status:         {}", self.report.status())?;
        writeln!(f, "Discovered:     {}", self.report.discovered)?;
        writeln!(f, "Rows Written:   {}", self.report.written)?;
        writeln!(f, "Files Skipped:  {}", self.report.skipped.len())?;
        writeln!(f, "Elapsed:        {:.2?}", self.report.elapsed)?;

        if !self.report.invalid_fields.is_empty() {
            writeln!(f)?;
            writeln!(f, "Invalid Fields")?;
            writeln!(f, "--------------")?;
            for field in &self.report.invalid_fields {
                writeln!(f, "  {}", field)?;
            }
        }

        if !self.report.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "Skipped Files")?;
            writeln!(f, "-------------")?;
            for path in &self.report.skipped {
                writeln!(f, "  {}", path.display())?;
            }
        }

        Ok(())
    }
}
