mod sheets;

pub use sheets::SheetsExporter;
