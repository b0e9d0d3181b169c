//! Escalation applied each time the "No" button is clicked.

/// Image shown once the reactions run out.
pub const FINAL_IMAGE: &str = "assets/images/crying.webp";
/// Image of the success screen.
pub const HUG_IMAGE: &str = "assets/images/hug.webp";

/// Reaction images for the first clicks, in order.
const REACTION_IMAGES: [&str; 4] = [
    "assets/images/shocked.webp",
    "assets/images/think.webp",
    "assets/images/angry.webp",
    FINAL_IMAGE,
];

/// Visual state after the `click_count`-th "No" click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoClickEffects {
    /// CSS transform of the "Yes" button.
    pub yes_transform: String,
    /// CSS transform of the "No" button.
    pub no_transform: String,
    /// CSS transform of the image and the question.
    pub lift_transform: String,
    /// New label of the "No" button, while variants remain.
    pub no_label: Option<String>,
    pub image: &'static str,
}

impl NoClickEffects {
    /// Computes the effects of click number `click_count` (starting at 1).
    ///
    /// "Yes" grows by 1.2 per click, "No" slides right by 50px and the image
    /// and question rise by 25px. The label steps through `no_labels`.
    #[must_use]
    pub fn for_click(click_count: u32, no_labels: Option<&[String]>) -> Self {
        // Scale in tenths keeps the arithmetic exact.
        let scale_tenths = 10 + u64::from(click_count) * 12;
        let yes_transform = format!("scale({}.{})", scale_tenths / 10, scale_tenths % 10);
        let no_transform = format!("translateX({}px)", u64::from(click_count) * 50);
        let lift_transform = format!("translateY(-{}px)", u64::from(click_count) * 25);

        let no_label = no_labels.and_then(|labels| {
            usize::try_from(click_count)
                .ok()
                .and_then(|count| count.checked_sub(1))
                .and_then(|index| labels.get(index))
                .cloned()
        });

        let image = usize::try_from(click_count)
            .ok()
            .and_then(|count| count.checked_sub(1))
            .and_then(|index| REACTION_IMAGES.get(index).copied())
            .unwrap_or(FINAL_IMAGE);

        Self { yes_transform, no_transform, lift_transform, no_label, image }
    }
}
