//! Menu entries

/// Main menu entries, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MainItem {
    #[default]
    EditDoses,
    SetTime,
    SetDate,
    Alarm,
    Wifi,
}

impl MainItem {
    pub const ALL: [MainItem; 5] = [
        MainItem::EditDoses,
        MainItem::SetTime,
        MainItem::SetDate,
        MainItem::Alarm,
        MainItem::Wifi,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MainItem::EditDoses => "Edit Doses",
            MainItem::SetTime => "Set Time",
            MainItem::SetDate => "Set Date",
            MainItem::Alarm => "Alarm",
            MainItem::Wifi => "WiFi",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Following entry, wrapping to the first
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

/// Dose menu entries, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DoseMenuItem {
    #[default]
    Add,
    Edit,
    Delete,
    Back,
}

impl DoseMenuItem {
    pub const ALL: [DoseMenuItem; 4] = [
        DoseMenuItem::Add,
        DoseMenuItem::Edit,
        DoseMenuItem::Delete,
        DoseMenuItem::Back,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DoseMenuItem::Add => "Add Dose",
            DoseMenuItem::Edit => "Edit Dose",
            DoseMenuItem::Delete => "Delete Dose",
            DoseMenuItem::Back => "Back",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}
