mod common;
mod quota;
