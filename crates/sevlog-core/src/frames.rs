//! Caller recovery by walking the live stack
//!
//! Frames are counted from the handler (0). The engine's dispatch frame is
//! located by symbol name and taken as frame 1, so the count does not depend
//! on how many helper frames the handler itself sits under. Inlined
//! functions are counted as separate frames when debug info lists them.

use backtrace::{Backtrace, BacktraceSymbol};

use crate::engine::Source;

const DISPATCH_OWNER: &str = "engine::Engine";
const DISPATCH_FN: &str = "::dispatch";

/// Source location `skip` frames above the handler, or `None` when the
/// stack cannot be symbolised or is shallower than requested
pub(crate) fn caller(skip: usize) -> Option<Source> {
    if skip == 0 {
        return None;
    }
    let trace = Backtrace::new();
    let symbols: Vec<&BacktraceSymbol> = trace
        .frames()
        .iter()
        .flat_map(|frame| frame.symbols())
        .collect();
    let anchor = symbols.iter().position(|s| is_dispatch(s))?;
    let symbol = symbols.get(anchor + skip - 1)?;

    Some(Source {
        file: symbol.filename()?.display().to_string(),
        function: symbol
            .name()
            .map(|name| format!("{:#}", name))
            .unwrap_or_default(),
        line: symbol.lineno()?,
    })
}

fn is_dispatch(symbol: &BacktraceSymbol) -> bool {
    symbol.name().is_some_and(|name| {
        let name = format!("{:#}", name);
        name.contains(DISPATCH_OWNER) && name.contains(DISPATCH_FN)
    })
}
