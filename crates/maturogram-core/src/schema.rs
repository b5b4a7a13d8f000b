//! # Checklist Schema
//!
//! The static shape of the instrument and of every stored record.
//!
//! Each of the 24 lustrum groups carries a title and six prompts. Form
//! field keys follow `l{group}_q{item}`; the persisted total of a group is
//! `l{group}_total`. [`Column`] lists every persisted column in its fixed
//! order, so exports and listings never assemble column names at runtime.

use crate::primitives::{CHECKLIST_ITEM_COUNT, LUSTRUM_COUNT};

// =============================================================================
// CHECKLIST ITEMS & GROUPS
// =============================================================================

/// One checklist prompt.
#[derive(Debug, PartialEq, Eq)]
pub struct ChecklistItem {
    /// Position in the flat 144-item response (0-based).
    pub index: usize,
    /// Form field / column key, e.g. `l3_q2`.
    pub key: &'static str,
    /// Prompt shown to the respondent.
    pub prompt: &'static str,
}

const fn item(index: usize, key: &'static str, prompt: &'static str) -> ChecklistItem {
    ChecklistItem { index, key, prompt }
}

/// One life-stage group of six prompts.
#[derive(Debug, PartialEq, Eq)]
pub struct LustrumGroup {
    /// 1-based group number (`l1`..`l24`).
    pub number: usize,
    /// Focus text of the group.
    pub title: &'static str,
    /// The six prompts, in form order.
    pub items: [ChecklistItem; 6],
    /// Column key of the group total.
    pub total_key: &'static str,
}

impl LustrumGroup {
    /// Title without the parenthesised detail, e.g. "Social Awareness".
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.title.split(" (").next().unwrap_or(self.title)
    }
}

/// All lustrum groups in life-stage order.
pub static LUSTRUMS: [LustrumGroup; LUSTRUM_COUNT] = [
    LustrumGroup {
        number: 1,
        title: "Foundational Growth (Motor, Attachment & Language)",
        items: [
            item(0, "l1_q1", "Demonstrates basic motor skills like crawling, walking, and grasping objects."),
            item(1, "l1_q2", "Acquires language fundamentals, such as babbling, first words, and simple sentences."),
            item(2, "l1_q3", "Engages in initial social interactions, like playing with caregivers or siblings."),
            item(3, "l1_q4", "Forms emotional attachments, showing separation anxiety or preference for familiar people."),
            item(4, "l1_q5", "Exhibits curiosity about the environment through exploration and sensory play."),
            item(5, "l1_q6", "Begins to recognize self in mirrors and responds to own name."),
        ],
        total_key: "l1_total",
    },
    LustrumGroup {
        number: 2,
        title: "Social Awareness (Friends, Empathy & Rules)",
        items: [
            item(6, "l2_q1", "Forms friendships with peers and participates in group play."),
            item(7, "l2_q2", "Understands and follows basic rules in games, school, or home settings."),
            item(8, "l2_q3", "Shows basic empathy, such as comforting a crying friend."),
            item(9, "l2_q4", "Demonstrates self-regulation, like controlling impulses or waiting turns."),
            item(10, "l2_q5", "Exhibits growing independence, such as dressing self or completing simple chores."),
            item(11, "l2_q6", "Develops interests in hobbies or activities outside family influence."),
        ],
        total_key: "l2_total",
    },
    LustrumGroup {
        number: 3,
        title: "Identity Formation (Identity, Emotion & Peer Interest)",
        items: [
            item(12, "l3_q1", "Increases self-awareness, questioning personal identity and values."),
            item(13, "l3_q2", "Shows strong interest in peer groups and social acceptance."),
            item(14, "l3_q3", "Explores identity through changes in appearance, interests, or beliefs."),
            item(15, "l3_q4", "Faces emotional challenges like mood swings or conflicts with authority"),
            item(16, "l3_q5", "Develops abstract thinking and begins to form opinions on broader issues."),
            item(17, "l3_q6", "Experiences physical changes associated with puberty."),
        ],
        total_key: "l3_total",
    },
    LustrumGroup {
        number: 4,
        title: "Independence and Responsibility (Independence, Responsibility & Beliefs)",
        items: [
            item(18, "l4_q1", "Pursues greater independence, such as driving, part-time jobs, or leaving home for education."),
            item(19, "l4_q2", "Takes on early adult responsibilities like managing finances or schedules."),
            item(20, "l4_q3", "Explores vocational interests through education or internships."),
            item(21, "l4_q4", "Solidifies personal values and beliefs, often through debate or activism."),
            item(22, "l4_q5", "Builds romantic relationships and navigates social complexities."),
            item(23, "l4_q6", "Develops long-term planning skills for future goals."),
        ],
        total_key: "l4_total",
    },
    LustrumGroup {
        number: 5,
        title: "Career and Relationship Focus (Career, Relationships & Goals)",
        items: [
            item(24, "l5_q1", "Transitions to full adult roles, such as independent living or full-time work."),
            item(25, "l5_q2", "Focuses on career-building through entry-level jobs or further education."),
            item(26, "l5_q3", "Forms deeper personal relationships, including serious partnerships."),
            item(27, "l5_q4", "Begins considering long-term goals like home ownership or family planning."),
            item(28, "l5_q5", "Manages personal finances more comprehensively."),
            item(29, "l5_q6", "Explores self-identity in professional and social contexts."),
        ],
        total_key: "l5_total",
    },
    LustrumGroup {
        number: 6,
        title: "Family and Career Advancement (Family, Career, Finance)",
        items: [
            item(30, "l6_q1", "Establishes a family, such as marriage or having children."),
            item(31, "l6_q2", "Advances in career through promotions or skill development."),
            item(32, "l6_q3", "Engages in financial planning, like saving for future needs."),
            item(33, "l6_q4", "Balances multiple responsibilities between work, family, and personal life."),
            item(34, "l6_q5", "Builds a stable home environment."),
            item(35, "l6_q6", "Develops stronger support networks with friends and family."),
        ],
        total_key: "l6_total",
    },
    LustrumGroup {
        number: 7,
        title: "Stability and Growth (Stability, Refinement & Health)",
        items: [
            item(36, "l7_q1", "Seeks stability in career and personal relationships."),
            item(37, "l7_q2", "Focuses on self-refinement through education or personal development."),
            item(38, "l7_q3", "Reassesses life goals and makes adjustments as needed."),
            item(39, "l7_q4", "Prioritizes health and well-being, such as regular exercise or diet."),
            item(40, "l7_q5", "Manages work-life balance more effectively."),
            item(41, "l7_q6", "Contributes to community or professional networks."),
        ],
        total_key: "l7_total",
    },
    LustrumGroup {
        number: 8,
        title: "Mid-Life Reflection (Reflection, Purpose & Adjustment)",
        items: [
            item(42, "l8_q1", "Reflects on past achievements and life satisfaction."),
            item(43, "l8_q2", "Adjusts personal and professional goals based on experiences."),
            item(44, "l8_q3", "Increases focus on life purpose and societal impact."),
            item(45, "l8_q4", "Pursues meaningful activities or causes."),
            item(46, "l8_q5", "Strengthens family bonds and friendships."),
            item(47, "l8_q6", "Addresses mid-life challenges like career plateaus or health concerns."),
        ],
        total_key: "l8_total",
    },
    LustrumGroup {
        number: 9,
        title: "Expanded Responsibility (Responsibility, Mentorship & Legacy)",
        items: [
            item(48, "l9_q1", "Reaches career peak with leadership positions."),
            item(49, "l9_q2", "Takes on mentorship roles for younger colleagues or family."),
            item(50, "l9_q3", "Focuses on children's development and education."),
            item(51, "l9_q4", "Invests in future legacy through savings or philanthropy."),
            item(52, "l9_q5", "Engages actively in community service."),
            item(53, "l9_q6", "Balances expanded responsibilities with personal fulfillment."),
        ],
        total_key: "l9_total",
    },
    LustrumGroup {
        number: 10,
        title: "Self-Actualization (Self-Actualization, Fulfillment)",
        items: [
            item(54, "l10_q1", "Recognizes personal strengths and limitations through self-reflection."),
            item(55, "l10_q2", "Nurtures younger generations via guidance or support."),
            item(56, "l10_q3", "Achieves fulfillment in long-term personal goals."),
            item(57, "l10_q4", "Pursues creative or intellectual interests."),
            item(58, "l10_q5", "Maintains work-life harmony."),
            item(59, "l10_q6", "Prepares for future life transitions."),
        ],
        total_key: "l10_total",
    },
    LustrumGroup {
        number: 11,
        title: "Wisdom Sharing (Wisdom, Guidance & Priorities)",
        items: [
            item(60, "l11_q1", "Broadens influence by sharing wisdom in professional or personal circles."),
            item(61, "l11_q2", "Continues self-care routines for physical and mental health."),
            item(62, "l11_q3", "Re-evaluates life priorities and makes shifts."),
            item(63, "l11_q4", "Mentors others extensively."),
            item(64, "l11_q5", "Engages in lifelong learning."),
            item(65, "l11_q6", "Strengthens emotional resilience."),
        ],
        total_key: "l11_total",
    },
    LustrumGroup {
        number: 12,
        title: "Preparation for Later Years (Retirement Preparation and Planning)",
        items: [
            item(66, "l12_q1", "Plans financially for retirement, such as investments or pensions."),
            item(67, "l12_q2", "Adjusts lifestyle for future needs."),
            item(68, "l12_q3", "Pursues meaningful activities like hobbies or travel."),
            item(69, "l12_q4", "Manages health proactively with check-ups and lifestyle changes."),
            item(70, "l12_q5", "Builds legacy through family or community contributions."),
            item(71, "l12_q6", "Transitions career towards reduced hours."),
        ],
        total_key: "l12_total",
    },
    LustrumGroup {
        number: 13,
        title: "Legacy and Reflection (Legacy, Family & Contribution)",
        items: [
            item(72, "l13_q1", "Enters retirement or reduces workload significantly."),
            item(73, "l13_q2", "Contributes via community service or volunteering."),
            item(74, "l13_q3", "Writes memoirs or documents life experiences."),
            item(75, "l13_q4", "Enjoys deeper family connections and gatherings."),
            item(76, "l13_q5", "Reflects on life achievements."),
            item(77, "l13_q6", "Maintains social engagements."),
        ],
        total_key: "l13_total",
    },
    LustrumGroup {
        number: 14,
        title: "Emotional Balance (Emotional Balance, Gratitude)",
        items: [
            item(78, "l14_q1", "Focuses on emotional stability through practices like meditation."),
            item(79, "l14_q2", "Prioritizes mental well-being and seeks support if needed."),
            item(80, "l14_q3", "Fosters gratitude for past and present experiences."),
            item(81, "l14_q4", "Accepts life's stages with grace."),
            item(82, "l14_q5", "Finds joy in simpler aspects like nature or daily routines."),
            item(83, "l14_q6", "Maintains positive outlook despite changes."),
        ],
        total_key: "l14_total",
    },
    LustrumGroup {
        number: 15,
        title: "Wisdom and Mentorship (Wisdom, Peace & Mentorship)",
        items: [
            item(84, "l15_q1", "Offers counsel and mentorship to younger family or community members."),
            item(85, "l15_q2", "Finds peace with life's accomplishments."),
            item(86, "l15_q3", "Fosters personal resilience and contentment."),
            item(87, "l15_q4", "Shares stories and lessons learned."),
            item(88, "l15_q5", "Engages in spiritual or philosophical pursuits."),
            item(89, "l15_q6", "Prioritizes meaningful relationships."),
        ],
        total_key: "l15_total",
    },
    LustrumGroup {
        number: 16,
        title: "Acceptance and Resilience (Acceptance, Resilience and Tradition)",
        items: [
            item(90, "l16_q1", "Adapts to health changes with aids or modifications."),
            item(91, "l16_q2", "Strengthens key relationships with family and friends."),
            item(92, "l16_q3", "Passes on traditions and cultural knowledge."),
            item(93, "l16_q4", "Appreciates life's journey through reflection."),
            item(94, "l16_q5", "Builds resilience against aging challenges."),
            item(95, "l16_q6", "Maintains independence where possible."),
        ],
        total_key: "l16_total",
    },
    LustrumGroup {
        number: 17,
        title: "Serenity and Reflection (Serenity, Reflection and Spirituality)",
        items: [
            item(96, "l17_q1", "Seeks serenity through mental and spiritual practices."),
            item(97, "l17_q2", "Reflects deeply on life experiences."),
            item(98, "l17_q3", "Celebrates family milestones and achievements."),
            item(99, "l17_q4", "Enjoys quiet pursuits like reading or contemplation."),
            item(100, "l17_q5", "Relies on support networks for daily needs."),
            item(101, "l17_q6", "Maintains a sense of purpose."),
        ],
        total_key: "l17_total",
    },
    LustrumGroup {
        number: 18,
        title: "Legacy Fulfillment (Storytelling, Legacy and Family)",
        items: [
            item(102, "l18_q1", "Engages in storytelling to preserve history."),
            item(103, "l18_q2", "Inspires future generations with insights."),
            item(104, "l18_q3", "Relies on spiritual beliefs for comfort."),
            item(105, "l18_q4", "Deepens family connections through interactions."),
            item(106, "l18_q5", "Focuses on legacy fulfillment."),
            item(107, "l18_q6", "Accepts assistance gracefully."),
        ],
        total_key: "l18_total",
    },
    LustrumGroup {
        number: 19,
        title: "Contentment and Inner Peace (Contentment, Peace and Simplicity)",
        items: [
            item(108, "l19_q1", "Emphasizes inner peace through mindfulness."),
            item(109, "l19_q2", "Embraces simplicity in daily life."),
            item(110, "l19_q3", "Strengthens bonds with loved ones."),
            item(111, "l19_q4", "Expresses gratitude for life's journey."),
            item(112, "l19_q5", "Reflects on positive memories."),
            item(113, "l19_q6", "Prioritizes comfort and well-being."),
        ],
        total_key: "l19_total",
    },
    LustrumGroup {
        number: 20,
        title: "Completion of Legacy (Closure, Reflection and Spirituality)",
        items: [
            item(114, "l20_q1", "Engages in final reflections on life."),
            item(115, "l20_q2", "Preserves memories through photos or writings."),
            item(116, "l20_q3", "Relies on support systems for care."),
            item(117, "l20_q4", "Seeks spiritual closure and peace."),
            item(118, "l20_q5", "Shares final wisdom with others."),
            item(119, "l20_q6", "Accepts end-of-life transitions."),
        ],
        total_key: "l20_total",
    },
    LustrumGroup {
        number: 21,
        title: "Extended Reflection (Century Reflection & Unity)",
        items: [
            item(120, "l21_q1", "Reflects on a century's worth of experiences."),
            item(121, "l21_q2", "Shares profound life wisdom."),
            item(122, "l21_q3", "Fosters family unity and resilience."),
            item(123, "l21_q4", "Celebrates centenarian status."),
            item(124, "l21_q5", "Maintains mental engagement."),
            item(125, "l21_q6", "Appreciates historical perspectives."),
        ],
        total_key: "l21_total",
    },
    LustrumGroup {
        number: 22,
        title: "Peaceful Acceptance (Peaceful Acceptance & Dignity)",
        items: [
            item(126, "l22_q1", "Embraces life's final stages peacefully."),
            item(127, "l22_q2", "Focuses on maintaining dignity."),
            item(128, "l22_q3", "Prioritizes meaningful connections."),
            item(129, "l22_q4", "Seeks comfort in daily routines."),
            item(130, "l22_q5", "Relies heavily on caregivers."),
            item(131, "l22_q6", "Finds solace in memories."),
        ],
        total_key: "l22_total",
    },
    LustrumGroup {
        number: 23,
        title: "Gratitude for Longevity (Longevity, Gratitude & Peace)",
        items: [
            item(132, "l23_q1", "Celebrates exceptional longevity."),
            item(133, "l23_q2", "Expresses gratitude for family and caregivers."),
            item(134, "l23_q3", "Fosters peace within self and others."),
            item(135, "l23_q4", "Appreciates established legacy."),
            item(136, "l23_q5", "Shares rare insights from extreme age."),
            item(137, "l23_q6", "Maintains a grateful mindset."),
        ],
        total_key: "l23_total",
    },
    LustrumGroup {
        number: 24,
        title: "Final Milestones (Final Wisdom & Closure)",
        items: [
            item(138, "l24_q1", "Accepts the full cycle of life."),
            item(139, "l24_q2", "Passes on last pieces of wisdom."),
            item(140, "l24_q3", "Finds closure in achievements and contributions."),
            item(141, "l24_q4", "Reflects on a lifetime of milestones."),
            item(142, "l24_q5", "Relies on comprehensive support."),
            item(143, "l24_q6", "Embraces final peace."),
        ],
        total_key: "l24_total",
    },
];

/// Look up a checklist item by its form key.
#[must_use]
pub fn item_by_key(key: &str) -> Option<&'static ChecklistItem> {
    LUSTRUMS
        .iter()
        .flat_map(|group| group.items.iter())
        .find(|item| item.key == key)
}

/// Iterate over all 144 items in response order.
pub fn all_items() -> impl Iterator<Item = &'static ChecklistItem> {
    LUSTRUMS.iter().flat_map(|group| group.items.iter())
}

// =============================================================================
// RECORD COLUMNS
// =============================================================================

/// Which of the five score fields a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreField {
    Lustrum,
    Decade,
    Generation,
    LifeStage,
    Maturogram,
}

impl ScoreField {
    /// Fields in column order.
    pub const ALL: [ScoreField; 5] = [
        ScoreField::Lustrum,
        ScoreField::Decade,
        ScoreField::Generation,
        ScoreField::LifeStage,
        ScoreField::Maturogram,
    ];

    fn suffix(self) -> &'static str {
        match self {
            ScoreField::Lustrum => "lustrum",
            ScoreField::Decade => "decade",
            ScoreField::Generation => "generation",
            ScoreField::LifeStage => "life_stage",
            ScoreField::Maturogram => "human_maturogram",
        }
    }

    fn title(self) -> &'static str {
        match self {
            ScoreField::Lustrum => "Lustrum",
            ScoreField::Decade => "Decade",
            ScoreField::Generation => "Generation",
            ScoreField::LifeStage => "Life Stage",
            ScoreField::Maturogram => "Human Maturogram",
        }
    }
}

/// A persisted record column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id,
    Age,
    Item(&'static LustrumGroup, &'static ChecklistItem),
    LustrumTotal(&'static LustrumGroup),
    Observed(ScoreField),
    Predicted(ScoreField),
    Percentage,
    Zone,
}

impl Column {
    /// Machine key of the column (CSV header, query parameter).
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Column::Id => "id".to_string(),
            Column::Age => "age".to_string(),
            Column::Item(_, item) => item.key.to_string(),
            Column::LustrumTotal(group) => group.total_key.to_string(),
            Column::Observed(field) => format!("observed_{}", field.suffix()),
            Column::Predicted(field) => format!("predicted_{}", field.suffix()),
            Column::Percentage => "percentage_hm".to_string(),
            Column::Zone => "maturity_zone".to_string(),
        }
    }

    /// Human-readable column label.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Column::Id => "S/N".to_string(),
            Column::Age => "Age".to_string(),
            Column::Item(group, item) => format!("{}: {}", group.name(), item.prompt),
            Column::LustrumTotal(group) => format!("{}: Total", group.name()),
            Column::Observed(field) => format!("Observed {}", field.title()),
            Column::Predicted(field) => format!("Predicted {}", field.title()),
            Column::Percentage => "Percentage Human Maturogram".to_string(),
            Column::Zone => "Maturity Zone".to_string(),
        }
    }
}

/// Number of persisted columns: id, age, 24 x (6 items + total), 10 scores,
/// percentage, zone.
pub const RECORD_COLUMN_COUNT: usize = 2 + CHECKLIST_ITEM_COUNT + LUSTRUM_COUNT + 10 + 2;

/// Every persisted column in fixed order.
#[must_use]
pub fn record_columns() -> Vec<Column> {
    let mut columns = Vec::with_capacity(RECORD_COLUMN_COUNT);
    columns.push(Column::Id);
    columns.push(Column::Age);
    for group in &LUSTRUMS {
        for item in &group.items {
            columns.push(Column::Item(group, item));
        }
        columns.push(Column::LustrumTotal(group));
    }
    columns.extend(ScoreField::ALL.into_iter().map(Column::Observed));
    columns.extend(ScoreField::ALL.into_iter().map(Column::Predicted));
    columns.push(Column::Percentage);
    columns.push(Column::Zone);
    columns
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn items_are_numbered_in_response_order() {
        for (expected, item) in all_items().enumerate() {
            assert_eq!(item.index, expected);
        }
        assert_eq!(all_items().count(), CHECKLIST_ITEM_COUNT);
    }

    #[test]
    fn group_numbers_are_sequential() {
        for (i, group) in LUSTRUMS.iter().enumerate() {
            assert_eq!(group.number, i + 1);
            assert_eq!(group.total_key, format!("l{}_total", i + 1));
        }
    }

    #[test]
    fn column_keys_are_unique() {
        let columns = record_columns();
        assert_eq!(columns.len(), RECORD_COLUMN_COUNT);

        let keys: BTreeSet<String> = columns.iter().map(Column::key).collect();
        assert_eq!(keys.len(), RECORD_COLUMN_COUNT);
    }

    #[test]
    fn column_order_starts_and_ends_fixed() {
        let columns = record_columns();
        assert_eq!(columns[0].key(), "id");
        assert_eq!(columns[1].key(), "age");
        assert_eq!(columns[2].key(), "l1_q1");
        assert_eq!(columns[8].key(), "l1_total");
        assert_eq!(columns[RECORD_COLUMN_COUNT - 12].key(), "observed_lustrum");
        assert_eq!(columns[RECORD_COLUMN_COUNT - 3].key(), "predicted_human_maturogram");
        assert_eq!(columns[RECORD_COLUMN_COUNT - 1].key(), "maturity_zone");
    }

    #[test]
    fn labels_use_short_group_name() {
        assert_eq!(LUSTRUMS[0].name(), "Foundational Growth");
        let total = Column::LustrumTotal(&LUSTRUMS[1]);
        assert_eq!(total.label(), "Social Awareness: Total");
        assert_eq!(Column::Observed(ScoreField::LifeStage).label(), "Observed Life Stage");
    }

    #[test]
    fn lookup_item_by_key() {
        let item = item_by_key("l24_q6").expect("last item");
        assert_eq!(item.index, CHECKLIST_ITEM_COUNT - 1);
        assert!(item_by_key("l25_q1").is_none());
    }
}
