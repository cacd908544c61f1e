//! HTML rendering of analytics reports.

pub mod html;
