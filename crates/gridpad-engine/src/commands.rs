use crate::error::EngineError;

/// Toolbar and menu actions that have no engine implementation yet.
/// Dispatching one reports `NotImplemented` instead of blocking the
/// caller with a dialog, so front ends can surface it however they
/// like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarCommand {
    Print,
    SpellCheck,
    PaintFormat,
    InsertChart,
    InsertImage,
    InsertLink,
    InsertComment,
    InsertFunction,
    MergeCells,
    TextWrapping,
    TextRotation,
    BorderStyle,
    FillColor,
    TextColor,
    FontFamily,
    FontSize,
    AlignLeft,
    AlignCenter,
    AlignRight,
    FreezeRows,
    FilterViews,
    Share,
}

impl ToolbarCommand {
    pub fn name(self) -> &'static str {
        match self {
            ToolbarCommand::Print => "print",
            ToolbarCommand::SpellCheck => "spell check",
            ToolbarCommand::PaintFormat => "paint format",
            ToolbarCommand::InsertChart => "insert chart",
            ToolbarCommand::InsertImage => "insert image",
            ToolbarCommand::InsertLink => "insert link",
            ToolbarCommand::InsertComment => "insert comment",
            ToolbarCommand::InsertFunction => "insert function",
            ToolbarCommand::MergeCells => "merge cells",
            ToolbarCommand::TextWrapping => "text wrapping",
            ToolbarCommand::TextRotation => "text rotation",
            ToolbarCommand::BorderStyle => "border style",
            ToolbarCommand::FillColor => "fill color",
            ToolbarCommand::TextColor => "text color",
            ToolbarCommand::FontFamily => "font family",
            ToolbarCommand::FontSize => "font size",
            ToolbarCommand::AlignLeft => "align left",
            ToolbarCommand::AlignCenter => "align center",
            ToolbarCommand::AlignRight => "align right",
            ToolbarCommand::FreezeRows => "freeze rows",
            ToolbarCommand::FilterViews => "filter views",
            ToolbarCommand::Share => "share",
        }
    }

    pub fn dispatch(self) -> Result<(), EngineError> {
        Err(EngineError::NotImplemented(self.name()))
    }
}
