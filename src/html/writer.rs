//! HTML projection of paragraphs, runs and nested content.

use super::cascade::{CssDeclarations, StyleCascade};
use super::config::HtmlContext;
use super::traits::ToHtml;
use crate::common::xml::{escape_attr, escape_text};
use crate::odf::elements::style::StyleDefinition;
use crate::odf::elements::text::{Content, FormattedText, Link, Paragraph, TextRun, space_width};

impl ToHtml for Paragraph {
    fn html(&self, context: &HtmlContext<'_>) -> Option<String> {
        let options = &context.options;
        let cascade = StyleCascade::new(context.styles, options);
        let mut html = String::from("<p");
        let mut close_span = false;

        match StyleCascade::attached(self) {
            Some(style) if !style.is_heading() => {
                if let Some(block) = style.paragraph_properties() {
                    html.push_str(&CssDeclarations::from_group(block, options).style_attribute());
                }
                html.push('>');
                if let Some(run) = style.text_properties() {
                    let css = CssDeclarations::from_group(run, options);
                    if !css.is_empty() {
                        html.push_str("<span");
                        html.push_str(&css.style_attribute());
                        html.push('>');
                        close_span = true;
                    }
                }
            },
            _ => {
                html.push_str(&cascade.global(self).style_attribute());
                html.push('>');
            },
        }

        if !self.runs().is_empty() {
            for run in self.runs().iter() {
                if let Some(fragment) = run.html(context) {
                    html.push_str(&fragment);
                }
            }
        } else {
            let mut body = String::new();
            for content in self.contents().iter() {
                if let Some(fragment) = content.html(context) {
                    body.push_str(&fragment);
                }
            }
            if body.is_empty() {
                body.push_str("&nbsp;");
            }
            html.push_str(&body);
        }

        if close_span {
            html.push_str("</span>");
        }
        html.push_str("</p>");
        if options.line_breaks {
            html.push('\n');
        }
        Some(html)
    }
}

impl ToHtml for Content {
    fn html(&self, context: &HtmlContext<'_>) -> Option<String> {
        match self {
            Content::Paragraph(paragraph) => paragraph.html(context),
            Content::Unknown(_) => None,
        }
    }
}

impl ToHtml for TextRun {
    fn html(&self, context: &HtmlContext<'_>) -> Option<String> {
        match self {
            TextRun::Simple(text) => Some(escape_text(text)),
            TextRun::Formatted(span) => span.html(context),
            TextRun::Space(count) => Some("&nbsp;".repeat(space_width(*count))),
            TextRun::Tab => Some("&emsp;".to_string()),
            TextRun::LineBreak => Some("<br>".to_string()),
            TextRun::Link(link) => link.html(context),
            TextRun::Unknown(_) => None,
        }
    }
}

fn runs_html(runs: &[TextRun], context: &HtmlContext<'_>) -> String {
    runs.iter().filter_map(|run| run.html(context)).collect()
}

impl ToHtml for FormattedText {
    fn html(&self, context: &HtmlContext<'_>) -> Option<String> {
        let inner = runs_html(self.runs(), context);
        let definition = self.style().or_else(|| {
            self.style_name()
                .and_then(|name| context.styles.get_style(name))
        });
        let css = definition
            .and_then(StyleDefinition::text_properties)
            .map(|group| CssDeclarations::from_group(group, &context.options))
            .unwrap_or_default();

        if css.is_empty() {
            Some(inner)
        } else {
            Some(format!("<span{}>{}</span>", css.style_attribute(), inner))
        }
    }
}

impl ToHtml for Link {
    fn html(&self, context: &HtmlContext<'_>) -> Option<String> {
        let inner = runs_html(self.runs(), context);
        match self.href() {
            Some(href) => Some(format!("<a href=\"{}\">{}</a>", escape_attr(href), inner)),
            None => Some(inner),
        }
    }
}
