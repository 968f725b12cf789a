use pdf_assembly::{SourceSpec, parse_ranges};

/// Parse a `FILE[:RANGE[,RANGE...]]` merge input.
///
/// When the text after the last `:` is not a range list the whole argument is
/// the file name, so Windows drive letters and odd file names still work.
pub fn parse_input(arg: &str) -> SourceSpec {
    if let Some((file, ranges)) = arg.rsplit_once(':') {
        if !file.is_empty() {
            if let Ok(ranges) = parse_ranges(ranges) {
                return SourceSpec::file(file).with_ranges(ranges);
            }
        }
    }
    SourceSpec::file(arg)
}
