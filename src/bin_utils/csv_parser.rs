use std::io::Read;

use csv::{StringRecordsIntoIter, Trim};

/// One invocation row: the operation name followed by its ordered arguments.
#[derive(Debug)]
pub struct OperationRow {
    pub name: String,
    pub args: Vec<String>,
}

/// Parses an operation list in CSV format. Rows carry no header and may
/// differ in length, since each operation takes its own argument count.
///
/// # Panics
///
/// If a row cannot be parsed
pub struct CsvOperationParser<R> {
    iter: StringRecordsIntoIter<R>,
}

impl<R> CsvOperationParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(source);

        Self {
            iter: reader.into_records(),
        }
    }
}

impl<R> Iterator for CsvOperationParser<R>
where
    R: Read,
{
    type Item = (u64, OperationRow);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| {
            let record = row.unwrap();
            let mut fields = record.iter().map(ToString::to_string);
            let name = fields.next().unwrap_or_default();
            (
                curr_line,
                OperationRow {
                    name,
                    args: fields.collect(),
                },
            )
        })
    }
}
