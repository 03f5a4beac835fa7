pub mod tokenize;

pub use tokenize::{first_word, short_flag_cluster_has, subcommand, tokenize};
