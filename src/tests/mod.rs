mod unit_config;
mod unit_frontmatter_parser;
mod unit_post_scanner;
