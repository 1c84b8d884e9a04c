//! What each form prints and where the value comes from.
//!
//! Every form type has a typed list of bindings; the renderer walks the list
//! instead of branching on key names. A binding's key must exist in the
//! form's default layout.

use chrono::NaiveDate;

use crate::form_type::FormType;
use crate::record::{format_date_display, normalize_date, scalar_text, AnimalRow, ApplicationRecord};

/// Signature boxes, in mm
pub const SIGNATURE_BOX_MM: (f64, f64) = (40.0, 15.0);

/// Photo box, in mm
pub const PHOTO_BOX_MM: (f64, f64) = (25.0, 25.0);

/// Rows the livestock table has room for
pub const ANIMAL_ROWS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
}

impl TextStyle {
    pub const REGULAR: TextStyle = TextStyle {
        size: 10.0,
        bold: false,
    };
    pub const SIGNATURE: TextStyle = TextStyle {
        size: 10.0,
        bold: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextSource {
    Field(&'static str),
    Date(&'static str),
    /// First non-empty of the named fields.
    FirstOf(&'static [&'static str]),
    Today,
    /// `FirstName LastName`
    FullName,
    /// Part of `Dimensions` ("LxWxD"), zero-based.
    Dimension(usize),
    /// Column of the livestock table, one-based row.
    Animal {
        row: usize,
        column: &'static str,
        date: bool,
    },
    /// The field's value unless it is one of `excluded`.
    Unless {
        field: &'static str,
        excluded: &'static [&'static str],
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    Always,
    /// Field equals one of `values`, ignoring case.
    Equals {
        field: &'static str,
        values: &'static [&'static str],
    },
    Flag(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text { source: TextSource, style: TextStyle },
    Check(Condition),
    Image {
        source: &'static str,
        width: f64,
        height: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBinding {
    pub key: &'static str,
    pub kind: FieldKind,
}

// ============================================================================
// Value Resolution
// ============================================================================

/// A record prepared for binding lookups.
pub struct BindingContext<'a> {
    record: &'a ApplicationRecord,
    animals: Vec<AnimalRow>,
    today: NaiveDate,
}

impl<'a> BindingContext<'a> {
    pub fn new(record: &'a ApplicationRecord, today: NaiveDate) -> Self {
        BindingContext {
            record,
            animals: record.animals(),
            today,
        }
    }

    pub fn text(&self, source: &TextSource) -> Option<String> {
        let record = self.record;
        let value = match *source {
            TextSource::Field(name) => record.text(name),
            TextSource::Date(name) => record.text(name).map(|v| normalize_date(&v)),
            TextSource::FirstOf(names) => names.iter().find_map(|n| record.text(n)),
            TextSource::Today => Some(format_date_display(&self.today)),
            TextSource::FullName => {
                let first = record.text("FirstName").unwrap_or_default();
                let last = record.text("LastName").unwrap_or_default();
                Some(format!("{} {}", first, last).trim().to_string())
            }
            TextSource::Dimension(index) => record
                .text("Dimensions")
                .and_then(|d| d.split('x').nth(index).map(|part| part.trim().to_string())),
            TextSource::Animal { row, column, date } => {
                if row == 0 || row > ANIMAL_ROWS {
                    return None;
                }
                let cell = self.animals.get(row - 1)?.get(column).and_then(scalar_text);
                if date {
                    cell.map(|v| normalize_date(&v))
                } else {
                    cell
                }
            }
            TextSource::Unless { field, excluded } => record
                .text(field)
                .filter(|v| !excluded.iter().any(|e| e.eq_ignore_ascii_case(v))),
        };
        value.filter(|v| !v.is_empty())
    }

    pub fn holds(&self, condition: &Condition) -> bool {
        match *condition {
            Condition::Always => true,
            Condition::Equals { field, values } => self
                .record
                .text(field)
                .is_some_and(|v| values.iter().any(|e| e.eq_ignore_ascii_case(v.trim()))),
            Condition::Flag(field) => self.record.flag(field),
        }
    }

    pub fn image(&self, source: &str) -> Option<String> {
        self.record.text(source).filter(|v| !v.trim().is_empty())
    }
}

// ============================================================================
// Binding Tables
// ============================================================================

const fn text(key: &'static str, source: TextSource) -> FieldBinding {
    FieldBinding {
        key,
        kind: FieldKind::Text {
            source,
            style: TextStyle::REGULAR,
        },
    }
}

const fn value(key: &'static str, field: &'static str) -> FieldBinding {
    text(key, TextSource::Field(field))
}

const fn date(key: &'static str, field: &'static str) -> FieldBinding {
    text(key, TextSource::Date(field))
}

const fn signed(key: &'static str, source: TextSource) -> FieldBinding {
    FieldBinding {
        key,
        kind: FieldKind::Text {
            source,
            style: TextStyle::SIGNATURE,
        },
    }
}

const fn check(key: &'static str, field: &'static str, values: &'static [&'static str]) -> FieldBinding {
    FieldBinding {
        key,
        kind: FieldKind::Check(Condition::Equals { field, values }),
    }
}

const fn always(key: &'static str) -> FieldBinding {
    FieldBinding {
        key,
        kind: FieldKind::Check(Condition::Always),
    }
}

const fn flag(key: &'static str, field: &'static str) -> FieldBinding {
    FieldBinding {
        key,
        kind: FieldKind::Check(Condition::Flag(field)),
    }
}

const fn image(key: &'static str, source: &'static str, size: (f64, f64)) -> FieldBinding {
    FieldBinding {
        key,
        kind: FieldKind::Image {
            source,
            width: size.0,
            height: size.1,
        },
    }
}

const fn animal(key: &'static str, row: usize, column: &'static str, date: bool) -> FieldBinding {
    text(key, TextSource::Animal { row, column, date })
}

/// Applicant identity, address, beneficiary and signature block; on every form.
const PERSONAL: &[FieldBinding] = &[
    text("date_app", TextSource::Today),
    value("farmer_id", "FarmersID"),
    value("last_name", "LastName"),
    value("first_name", "FirstName"),
    value("mid_name", "MiddlName"),
    value("suffix", "ExtName"),
    value("guardian", "Guardian"),
    value("guardian_rel", "GuardianRelationship"),
    date("guardian_birth", "GuardianBirthdate"),
    value("addr_street", "StFarmer"),
    value("addr_brgy", "BrgyFarmer"),
    value("addr_muni", "MunFarmer"),
    value("addr_prov", "ProvFarmer"),
    value("contact", "Mobile"),
    date("birthday", "Birthdate"),
    value("account_no", "Account"),
    value("rsbsa_id", "RSBSAID"),
    check("sex_male", "Sex", &["MALE"]),
    check("sex_female", "Sex", &["FEMALE"]),
    check("civ_single", "CivilStatus", &["SINGLE"]),
    check("civ_married", "CivilStatus", &["MARRIED"]),
    check("civ_widow", "CivilStatus", &["WIDOW", "WIDOW/ER"]),
    check("civ_sep", "CivilStatus", &["SEPARATED"]),
    value("spouse", "Spouse"),
    value("bene_name", "Beneficiary"),
    value("bene_rel", "BeneRelationship"),
    date("bene_birth", "BeneBirthdate"),
    signed("sign_name", TextSource::FullName),
    text("sign_date", TextSource::Today),
    image("signature_img", "Signature", SIGNATURE_BOX_MM),
    image("farmer_photo", "Photo", PHOTO_BOX_MM),
];

const SECTORS: &[FieldBinding] = &[
    check("sec_ip", "Sector", &["IP"]),
    check("sec_pwd", "Sector", &["PWD"]),
    check("sec_sc", "Sector", &["SC"]),
    check("sec_youth", "Sector", &["YOUTH"]),
];

const PAYMENT: &[FieldBinding] = &[
    check("mop_palawan", "PaymentMethod", &["Palawan Express"]),
    check("mop_gcash", "PaymentMethod", &["GCash"]),
    check("mop_landbank", "PaymentMethod", &["Landbank"]),
    check("mop_others", "PaymentMethod", &["Others"]),
];

/// Certification and privacy consent are required before a record is saved.
const CONSENT: &[FieldBinding] = &[always("consent_certify_check"), always("consent_privacy_check")];

const ASSIGNMENT: &[FieldBinding] = &[flag("consent_assign_check", "ConsentAssignment")];

const CROP: &[FieldBinding] = &[
    text(
        "crop_high_txt",
        TextSource::Unless {
            field: "CropType",
            excluded: &["RICE", "CORN"],
        },
    ),
    value("l1_area", "Area"),
    value("amount_cover", "AmountCover"),
    value("farm_prov", "ProvFarm"),
    value("farm_mun", "MunFarm"),
    value("farm_brgy", "BrgyFarm"),
    value("farm_purok", "FarmPurok"),
    value("georef_id", "Georef"),
    date("date_planting", "Planting"),
    value("farm_id", "FarmID"),
    value("bound_north", "North"),
    value("bound_south", "South"),
    value("bound_east", "East"),
    value("bound_west", "West"),
    value("l1_var", "Variety"),
    check("l1_meth_ds", "TypePlanting", &["DIRECT"]),
    check("l1_meth_tp", "TypePlanting", &["TRANSPLANTED"]),
    date("l1_sow", "Sowing"),
    date("l1_harv", "Harvest"),
    value("l1_trees", "TreesHills"),
];

const LIVESTOCK: &[FieldBinding] = &[
    value("live_prov", "ProvFarm"),
    value("live_mun", "MunFarm"),
    value("live_bgy", "BrgyFarm"),
    value("live_sitio", "StFarm"),
    value("live_animal_type", "AnimalType"),
];

macro_rules! animal_row {
    ($row:literal) => {
        [
            animal(concat!("ls_class_", $row), $row, "Class", false),
            animal(concat!("ls_tag_", $row), $row, "Tag", false),
            animal(concat!("ls_male_", $row), $row, "Male", false),
            animal(concat!("ls_female_", $row), $row, "Female", false),
            animal(concat!("ls_age_", $row), $row, "Age", false),
            animal(concat!("ls_dob_", $row), $row, "DOB", true),
            animal(concat!("ls_breed_", $row), $row, "Breed", false),
            animal(concat!("ls_color_", $row), $row, "Color", false),
            animal(concat!("ls_val_", $row), $row, "Value", false),
        ]
    };
}

static ANIMAL_TABLE: [[FieldBinding; 9]; ANIMAL_ROWS] = [
    animal_row!(1),
    animal_row!(2),
    animal_row!(3),
    animal_row!(4),
    animal_row!(5),
    animal_row!(6),
];

const ADSS: &[FieldBinding] = &[
    value("adss_occupation", "Occupation"),
    text("adss_work_addr", TextSource::FirstOf(&["Address", "Sitio"])),
    value("adss_premium", "Premium"),
    value("adss_cover", "AmountCover"),
    value("adss_ben1_name", "BeneSecondary"),
    value("adss_ben1_rel", "BeneSecondaryRel"),
    date("adss_ben1_bday", "BeneSecondaryBday"),
    flag("adss_is_minor", "IsMinor"),
    signed("guardian_sign_name", TextSource::Field("Guardian")),
    text("guardian_sign_date", TextSource::Today),
    image("guardian_signature_img", "GuardianSignature", SIGNATURE_BOX_MM),
];

const BANCA: &[FieldBinding] = &[
    value("bn_home_port", "Address"),
    value("bn_usage", "Usage"),
    value("bn_boat_material", "BoatMaterial"),
    value("bn_boat_type", "BoatType"),
    value("bn_motor_no", "HullNo"),
    value("bn_chassis_no", "ChassisNo"),
    value("bn_boat_age", "BoatAge"),
    value("bn_boat_color", "BoatColor"),
    text("bn_dim_length", TextSource::Dimension(0)),
    text("bn_dim_width", TextSource::Dimension(1)),
    text("bn_dim_depth", TextSource::Dimension(2)),
    value("amount_cover", "AmountCover"),
    date("bn_period_from", "PeriodFrom"),
    date("bn_period_to", "PeriodTo"),
    value("bn_mortgage_to", "MortgageTo"),
    value("bn_mortgage_branch", "MortgageBranch"),
    value("bn_mortgage_addr", "MortgageAddr"),
    value("bn_others", "Others"),
];

/// Everything the renderer draws for `form_type`, in table order.
pub fn bindings(form_type: FormType) -> Vec<&'static FieldBinding> {
    let groups: Vec<&'static [FieldBinding]> = match form_type {
        FormType::Crop => vec![PERSONAL, SECTORS, PAYMENT, CONSENT, ASSIGNMENT, CROP],
        FormType::Livestock => vec![
            PERSONAL,
            SECTORS,
            PAYMENT,
            CONSENT,
            ASSIGNMENT,
            LIVESTOCK,
            ANIMAL_TABLE.as_flattened(),
        ],
        FormType::Adss => vec![PERSONAL, SECTORS, PAYMENT, CONSENT, ADSS],
        FormType::Banca => vec![PERSONAL, BANCA],
    };
    groups.into_iter().flatten().collect()
}

// ============================================================================
// Editor Sections
// ============================================================================

/// Applicant-profile fields, shared in spirit across forms; everything else
/// is form-specific.
const PROFILE_FIELDS: &[&str] = &[
    "date_app", "farmer_id", "last_name", "first_name", "mid_name", "suffix",
    "addr_street", "addr_brgy", "addr_muni", "addr_prov", "contact", "birthday",
    "sex_male", "sex_female", "civ_single", "civ_married", "civ_widow", "civ_sep",
    "spouse", "sec_ip", "sec_pwd", "sec_sc", "sec_youth", "bene_name", "bene_rel",
    "bene_birth", "guardian", "guardian_rel", "guardian_birth", "sign_name", "sign_date",
    "account_no", "rsbsa_id", "signature_img", "guardian_signature_img", "farmer_photo",
    "mop_palawan", "mop_gcash", "mop_landbank", "mop_others",
];

const PRODUCT_PREFIXES: &[&str] = &["adss_", "crop_", "live_", "bn_"];

pub fn is_profile_field(key: &str) -> bool {
    let bare = PRODUCT_PREFIXES
        .iter()
        .find_map(|p| key.strip_prefix(p))
        .unwrap_or(key);
    PROFILE_FIELDS.contains(&key) || PROFILE_FIELDS.contains(&bare)
}
