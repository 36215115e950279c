pub mod cli;
pub mod completion;
pub mod generate;
