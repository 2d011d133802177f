mod common;
mod comparison;
mod narrative;
mod routing;
