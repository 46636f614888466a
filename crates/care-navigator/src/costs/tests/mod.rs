mod common;
mod household;
