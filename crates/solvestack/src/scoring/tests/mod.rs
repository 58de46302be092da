mod common;
mod matching;
mod ranking;
