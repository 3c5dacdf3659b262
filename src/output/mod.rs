pub mod formatter;

pub use formatter::{
    format_analysis_header, format_location_detail, format_ranked_table, format_score_result,
    format_tsv, should_use_colors,
};
