mod common;
mod flags;
mod narrative;
mod routing;
