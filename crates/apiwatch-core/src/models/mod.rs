mod filter;
mod period;
mod record;
mod report;
mod request_log;
mod summary;

pub use filter::{FilterCriteria, SeveritySelection, TimeWindow};
pub use period::Period;
pub use record::{ErrorLog, ErrorRecord, Field, Severity};
pub use report::{ExportFile, LoadReport, RecordPage};
pub use request_log::{RequestLogEntry, RequestLogTail};
pub use summary::{
    CountEntry, CountTable, DailyPoint, DashboardSummary, DashboardView, DateSpanStats,
    HourBucket, HourlyHistogram, MessageCount, PeriodOption, SeverityKpis, TypeShare,
};
