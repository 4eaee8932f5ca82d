use crate::record::TypeRecord;
use anyhow::Result;
use std::io::Write;

/// Renders a batch of records into one output document.
pub trait Generator {
    fn output(&self, records: &[TypeRecord], writer: &mut dyn Write) -> Result<()>;
}
