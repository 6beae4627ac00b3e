//! Built-in demonstration operations
//!
//! Every operation answers bad input with a descriptive string instead of an
//! error; only a missing argument (possible when invoked without the
//! dispatcher's validation) is reported as a failure.

mod calculator;
mod movie;
mod schedule;
mod translate;
mod weather;

pub use calculator::Calculator;
pub use movie::RecommendMovie;
pub use schedule::AddSchedule;
pub use translate::Translate;
pub use weather::GetWeather;

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::error::{DispatchError, OperationFailure};
use crate::registry::Registry;
use crate::value::Arguments;

/// Registry holding the five built-in operations, in declaration order:
/// weather, calculator, translate, add_schedule, recommend_movie.
pub fn builtin_registry(catalog: Arc<Catalog>) -> Result<Registry, DispatchError> {
    let mut registry = Registry::new();
    registry.register(GetWeather::spec(), GetWeather::new(catalog.clone()))?;
    registry.register(Calculator::spec(), Calculator)?;
    registry.register(Translate::spec(&catalog), Translate::new(catalog.clone()))?;
    registry.register(AddSchedule::spec(), AddSchedule)?;
    registry.register(RecommendMovie::spec(&catalog), RecommendMovie::new(catalog))?;
    Ok(registry)
}

fn required_str<'a>(args: &'a Arguments, name: &str) -> Result<&'a str, OperationFailure> {
    args.str(name)
        .ok_or_else(|| OperationFailure::new(format!("missing string argument '{}'", name)))
}

fn required_number(args: &Arguments, name: &str) -> Result<f64, OperationFailure> {
    args.number(name)
        .ok_or_else(|| OperationFailure::new(format!("missing number argument '{}'", name)))
}
