pub mod prompts;
pub mod render;
pub mod report;

pub use prompts::{collect_form, edit_macros, edit_servings, prompt_text, prompt_yes_no};
pub use render::{display_rejected, display_session};
pub use report::{
    Audience, ReportSnapshot, missing_for_export, render_report, report_file_name,
    write_serving_grid,
};
