use crate::photo::ImageRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpacerSide {
    Left,
    Right,
}

/// One slot in the horizontally scrolling strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselEntry {
    /// Edge padding so the first and last photo can be centered
    Spacer(SpacerSide),
    Item(ImageRecord),
}

impl CarouselEntry {
    pub fn record(&self) -> Option<&ImageRecord> {
        match self {
            CarouselEntry::Item(record) => Some(record),
            CarouselEntry::Spacer(_) => None,
        }
    }

    pub fn is_spacer(&self) -> bool {
        matches!(self, CarouselEntry::Spacer(_))
    }
}

/// Wrap fetched records as `[Spacer(Left), Item*, Spacer(Right)]`
pub fn pad_entries(records: Vec<ImageRecord>) -> Vec<CarouselEntry> {
    let mut entries = Vec::with_capacity(records.len() + 2);
    entries.push(CarouselEntry::Spacer(SpacerSide::Left));
    entries.extend(records.into_iter().map(CarouselEntry::Item));
    entries.push(CarouselEntry::Spacer(SpacerSide::Right));
    entries
}
