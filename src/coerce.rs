//! Best-effort numeric coercion of grid cells.
//!
//! Parameter values and raw data arrive as text. Anything that parses as
//! a float becomes [`Value::Number`]; everything else passes through
//! unchanged as [`Value::Text`]. Non-numeric text is expected in these
//! files (unit labels, status words) and is never an error.

use crate::grid::Cell;
use crate::models::Value;
use tracing::trace;

/// Coerce one cell to a number if it parses, else keep its text
pub fn coerce(cell: &Cell) -> Value {
    match cell {
        Cell::Empty => Value::Missing,
        Cell::Text(text) => coerce_str(text),
    }
}

/// Coerce a string; surrounding whitespace is ignored for the numeric check
pub fn coerce_str(text: &str) -> Value {
    match text.trim().parse::<f64>() {
        Ok(number) => Value::Number(number),
        Err(_) => {
            trace!("Keeping non-numeric value '{}'", text);
            Value::Text(text.to_string())
        }
    }
}

/// Element-wise [`coerce`] over a run of cells
pub fn coerce_all<'a, I>(cells: I) -> Vec<Value>
where
    I: IntoIterator<Item = &'a Cell>,
{
    cells.into_iter().map(coerce).collect()
}
