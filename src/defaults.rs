//! Built-in field positions for every form type.
//!
//! Coordinates were calibrated against the scanned blank forms and are
//! percentages of page width/height. Custom layouts may move these fields
//! but never add new ones.

use crate::form_type::FormType;
use crate::layout::Anchor;

#[derive(Debug, Clone, Copy)]
pub struct DefaultPosition {
    pub key: &'static str,
    pub label: &'static str,
    pub x: f64,
    pub y: f64,
    pub anchor: Anchor,
}

const fn field(key: &'static str, label: &'static str, x: f64, y: f64) -> DefaultPosition {
    DefaultPosition {
        key,
        label,
        x,
        y,
        anchor: Anchor::Baseline,
    }
}

/// Image boxes are placed by their center.
const fn image(key: &'static str, label: &'static str, x: f64, y: f64) -> DefaultPosition {
    DefaultPosition {
        key,
        label,
        x,
        y,
        anchor: Anchor::Center,
    }
}

pub fn positions(form_type: FormType) -> &'static [DefaultPosition] {
    match form_type {
        FormType::Crop => CROP,
        FormType::Livestock => LIVESTOCK,
        FormType::Adss => ADSS,
        FormType::Banca => BANCA,
    }
}

const CROP: &[DefaultPosition] = &[
    field("crop_high_txt", "High Value Details", 10.02657899804349, 15.664397061829593),
    field("date_app", "Date of Application", 83.60443208012889, 13.914358205936232),
    field("farmer_id", "Farmer ID", 31.01564644582508, 15.350183513110016),
    field("last_name", "Last Name", 18.493074739408627, 19.64340417433283),
    field("first_name", "First Name", 31.897506872372617, 19.643403800750356),
    field("mid_name", "Middle Name", 46.44044316046126, 19.643403800750356),
    field("suffix", "Name Suffix", 60.35639816401922, 19.648850254977358),
    field("addr_street", "Street/Purok", 17.677562274034646, 23.22207208922321),
    field("addr_brgy", "Barangay", 29.7975068723726, 23.22207208922321),
    field("addr_muni", "Municipality", 49.77091407458867, 23.224139405706204),
    field("addr_prov", "Province", 63.905817121680094, 23.2669030975486),
    field("contact", "Contact", 74.10681540828324, 20.26734742919647),
    field("birthday", "Birthday", 82.32686975325903, 22.924139312310583),
    field("sex_male", "Male Check", 9.889196623065134, 26.93936822242945),
    field("sex_female", "Female Check", 15.775623215862918, 26.841435819099292),
    field("civ_single", "Single Check", 18.684210473480647, 28.506286675711944),
    field("civ_married", "Married Check", 24.501384988716104, 28.457320474046867),
    field("civ_widow", "Widow Check", 32.880886373757654, 28.653185280707177),
    field("civ_sep", "Separated Check", 43.337950085669014, 28.496492837646976),
    field("spouse", "Spouse Name", 65.75581367137275, 28.72296754479259),
    field("sec_ip", "IP Sector", 58.0060840595198, 26.833443355676867),
    field("sec_pwd", "PWD Sector", 28.94459801507128, 26.786205250948967),
    field("sec_sc", "SC Sector", 35.35816734901854, 26.88068146040476),
    field("bene_name", "Beneficiary Name", 22.493074739408627, 31.982886993932482),
    field("bene_rel", "Relationship", 86.0664819416247, 31.483431139216734),
    field("bene_birth", "Beneficiary Birthday", 78.17174509951943, 32.60965452467847),
    field("guardian", "Guardian Name", 21.261676417113616, 34.38713893007999),
    field("guardian_rel", "Guardian Relationship", 84.79609763152868, 34.34430200741186),
    field("guardian_birth", "Guardian Birthday", 77.58083213083802, 35.4780165208813),
    field("l1_area", "Lot 1 Area", 34.68144039037816, 42.70855424958429),
    field("amount_cover", "Amount Cover", 24.393905764339365, 78.21318266144574),
    field("farm_purok", "Farm Purok", 24.20122902850611, 45.964875770473554),
    field("farm_prov", "Farm Province", 24.155124600904472, 51.544122833438344),
    field("farm_mun", "Farm Municipality", 24.155124600904472, 49.681339573495535),
    field("farm_brgy", "Farm Barangay", 24.155124600904472, 47.96752251521781),
    field("georef_id", "Georef ID", 60.07713249027361, 61.50621222595037),
    field("date_planting", "Date Planting", 24.293628756029122, 69.90231326450291),
    field("farm_id", "Farm ID", 24.293628756029122, 63.03725418198679),
    field("bound_north", "North Boundary", 24.293628756029122, 54.62485834499857),
    field("bound_south", "South Boundary", 24.293628756029122, 58.15042486488419),
    field("bound_east", "East Boundary", 24.501384988716104, 56.534540209936615),
    field("bound_west", "West Boundary", 24.43213291115378, 59.96217432649207),
    field("l1_trees", "Trees/Hills", 24.388919614754876, 74.2407175365649),
    field("l1_var", "Lot 1 Variety", 24.411911304505573, 64.84127441353982),
    field("l1_meth_ds", "Lot 1 Direct Check", 24.134421014610826, 66.11090102302327),
    field("l1_meth_tp", "Lot 1 Trans Check", 33.71191130450558, 65.91646325350165),
    field("l1_sow", "Lot 1 Sowing", 24.404155071818593, 68.1220099251),
    field("l1_harv", "Lot 1 Harvest", 24.38132018531721, 71.5963884531435),
    field("sign_name", "Signature Name", 77.22645917648684, 83.68934326348413),
    field("sign_date", "Sign Date", 81.56509690007344, 88.80533470389285),
    field("sec_youth", "Youth Sector", 45.42584456233166, 26.819654522921667),
    field("consent_certify_check", "Certify Check", 8.501345763114376, 80.87383804757164),
    field("consent_privacy_check", "Privacy Check", 8.501345763114376, 84.51117211161939),
    field("consent_assign_check", "Assign Check", 8.501345763114376, 88.33745859457873),
    field("mop_palawan", "MoP Palawan", 48.36539717372416, 38.388000829434695),
    field("mop_gcash", "MoP GCash", 8.701769804800227, 39.63496973693588),
    field("mop_landbank", "MoP Landbank", 8.815052947716042, 38.38800227102725),
    field("mop_others", "MoP Others", 48.432205187619445, 39.7106677618157),
    field("account_no", "Account No", 75.44297568618893, 37.13135018635755),
    field("rsbsa_id", "RSBSA ID", 24.668885125773098, 96.50965071250424),
    image("signature_img", "Signature Image", 84.39524954815698, 84.74736263525887),
    image("farmer_photo", "Farmer Photo", 6.796777562155583, 0.5687696456898335),
];

const LIVESTOCK: &[DefaultPosition] = &[
    field("date_app", "Date of Application", 78.99168453487448, 10.74784246213167),
    field("farmer_id", "Farmer ID", 12.643442624621985, 11.928795080328996),
    field("last_name", "Last Name", 15.382571194328627, 16.186092575894946),
    field("first_name", "First Name", 29.278638084547694, 16.180224505839373),
    field("mid_name", "Middle Name", 44.243633197091306, 16.180224505839373),
    field("suffix", "Name Suffix", 59.876708448587756, 16.227462610567265),
    field("addr_street", "Street/Purok", 16.384691402757888, 20.50353804293547),
    field("addr_brgy", "Barangay", 29.946718223500536, 20.50353804293547),
    field("addr_muni", "Municipality", 45.91383354447341, 20.50353804293547),
    field("addr_prov", "Province", 58.740972212367936, 20.645252357119148),
    field("contact", "Contact", 73.50554328322569, 16.841557791830805),
    field("birthday", "Birthday", 73.50554328322569, 20.43165375115068),
    field("sex_male", "Male Check", 7.900073638056821, 24.541368862477377),
    field("sex_female", "Female Check", 13.645562833051242, 24.49413075774948),
    field("civ_single", "Single Check", 17.520427638977715, 26.005750109042058),
    field("civ_married", "Married Check", 23.733572931239124, 26.005750109042058),
    field("civ_widow", "Widow Check", 32.08457466814962, 25.911273899586273),
    field("civ_sep", "Separated Check", 42.306200794128074, 25.911273899586273),
    field("spouse", "Spouse Name", 65.22134956021047, 25.633713994496116),
    field("sec_ip", "IP Sector", 58.0728920734151, 24.068987815198444),
    field("sec_pwd", "PWD Sector", 25.871429375888212, 24.16933274793143),
    field("sec_sc", "SC Sector", 32.75265480710246, 24.216570852659324),
    field("sec_youth", "Youth Sector", 44.31044121098659, 24.216570852659324),
    field("bene_name", "Beneficiary Name", 19.19062798635981, 29.507238582183348),
    field("bene_rel", "Relationship", 84.2616335203664, 29.03485753490442),
    field("bene_birth", "Beneficiary Birthday", 76.91275199188517, 30.074095838918062),
    field("guardian", "Guardian Name", 18.522547847406972, 32.62495349422429),
    field("guardian_rel", "Guardian Relationship", 83.72716940920414, 32.596492132479824),
    field("guardian_birth", "Guardian Birthday", 76.91275199188517, 33.63573043649347),
    field("sign_name", "Signature Name", 78.24891226979086, 78.9843138584559),
    field("sign_date", "Sign Date", 79.38464850601068, 84.79460073998676),
    field("account_no", "Account No", 75.37616767229365, 35.553715987353655),
    field("rsbsa_id", "RSBSA ID", 42.50662483581392, 93.76984063828644),
    image("signature_img", "Signature Image", 84.2616335203664, 80.4014570002927),
    image("farmer_photo", "Farmer Photo", 6.6307213740464235, 0.5444120211058376),
    field("mop_palawan", "MoP Palawan", 44.77809730825358, 36.753445348534406),
    field("mop_gcash", "MoP GCash", 7.632841582475685, 38.382133547750044),
    field("mop_landbank", "MoP Landbank", 7.5660335685804, 36.870514196457464),
    field("mop_others", "MoP Others", 44.711289294358295, 38.21782659509909),
    field("consent_certify_check", "Certify Check", 8.501345763114376, 76.38621809842179),
    field("consent_privacy_check", "Privacy Check", 8.367729735323808, 80.07079026719744),
    field("consent_assign_check", "Assign Check", 8.768577818695512, 83.42469570287786),
    field("live_prov", "Livestock Prov", 76.05628142941096, 42.26651332735015),
    field("live_mun", "Livestock Mun", 58.08492569157957, 42.26651332735015),
    field("live_bgy", "Livestock Brgy", 38.431335988201596, 42.18582739224211),
    field("live_sitio", "Livestock Sitio", 21.107727504448295, 42.07257299821035),
    field("live_animal_type", "Animal Type", 56.949189455359736, 44.722894773200586),
    field("ls_class_1", "R1 Class", 7.165185485208696, 58.48297352336521),
    field("ls_tag_1", "R1 Tag", 16.196300979236504, 58.658135667929045),
    field("ls_male_1", "R1 Male", 25.549422924576266, 58.61089756320115),
    field("ls_female_1", "R1 Female", 31.428528147361256, 58.658135667929045),
    field("ls_age_1", "R1 Age", 37.84209748130852, 58.46918324901746),
    field("ls_dob_1", "R1 DOB", 47.63050902087604, 58.27524291987767),
    field("ls_breed_1", "R1 Breed", 61.125727827723395, 58.369719129333454),
    field("ls_color_1", "R1 Color", 72.75032224550282, 58.46419533878924),
    field("ls_val_1", "R1 Value", 82.77152432979541, 58.511433443517134),
    field("ls_class_2", "R2 Class", 7.5660335685804, 60.797640655031984),
    field("ls_tag_2", "R2 Tag", 16.062684951445938, 60.972802799595804),
    field("ls_male_2", "R2 Male", 25.616230938471546, 60.78385038068422),
    field("ls_female_2", "R2 Female", 31.562144175151825, 60.831088485412124),
    field("ls_age_2", "R2 Age", 37.84209748130852, 60.78385038068422),
    field("ls_dob_2", "R2 DOB", 47.63050902087604, 60.68438626100021),
    field("ls_breed_2", "R2 Breed", 61.05891981382812, 60.637148156272325),
    field("ls_color_2", "R2 Color", 72.54989820381697, 60.68438626100021),
    field("ls_val_2", "R2 Value", 82.70471631590013, 60.73162436572811),
    field("ls_class_3", "R3 Class", 7.499225554685116, 62.92335536778716),
    field("ls_tag_3", "R3 Tag", 16.263108993131787, 63.098517512350995),
    field("ls_male_3", "R3 Male", 25.616230938471546, 63.0512794076231),
    field("ls_female_3", "R3 Female", 31.628952189047105, 62.90956509343941),
    field("ls_age_3", "R3 Age", 37.641673439622664, 63.004041302895196),
    field("ls_dob_3", "R3 DOB", 47.496892993085474, 62.99905339266698),
    field("ls_breed_3", "R3 Breed", 61.05891981382812, 62.99905339266698),
    field("ls_color_3", "R3 Color", 72.48309018992167, 62.951815287939084),
    field("ls_val_3", "R3 Value", 82.70471631590013, 63.04629149739487),
    field("ls_class_4", "R4 Class", 7.632841582475685, 65.09630818527025),
    field("ls_tag_4", "R4 Tag", 16.329917007027074, 65.41318464401775),
    field("ls_male_4", "R4 Male", 25.415806896785696, 65.41318464401775),
    field("ls_female_4", "R4 Female", 31.562144175151825, 65.22423222510618),
    field("ls_age_4", "R4 Age", 37.70848145351795, 65.27147032983407),
    field("ls_dob_4", "R4 DOB", 47.496892993085474, 65.36095862906163),
    field("ls_breed_4", "R4 Breed", 60.992111799932836, 65.36095862906163),
    field("ls_color_4", "R4 Color", 72.54989820381697, 65.26648241960584),
    field("ls_val_4", "R4 Value", 82.70471631590013, 65.26648241960584),
    field("ls_class_5", "R5 Class", 7.432417540789832, 67.26926100275332),
    field("ls_tag_5", "R5 Tag", 16.196300979236504, 67.58613746150083),
    field("ls_male_5", "R5 Male", 25.415806896785696, 67.58613746150083),
    field("ls_female_5", "R5 Female", 31.562144175151825, 67.49166125204505),
    field("ls_age_5", "R5 Age", 37.70848145351795, 67.44442314731714),
    field("ls_dob_5", "R5 DOB", 47.496892993085474, 67.34495902763314),
    field("ls_breed_5", "R5 Breed", 60.992111799932836, 67.43943523708893),
    field("ls_color_5", "R5 Color", 72.48309018992167, 67.48667334181681),
    field("ls_val_5", "R5 Value", 82.70471631590013, 67.48667334181681),
    field("ls_class_6", "R6 Class", 7.766457610266252, 69.58392813442008),
    field("ls_tag_6", "R6 Tag", 16.196300979236504, 69.94804269789549),
    field("ls_male_6", "R6 Male", 25.549422924576266, 69.71185217425602),
    field("ls_female_6", "R6 Female", 31.562144175151825, 69.75909027898392),
    field("ls_age_6", "R6 Age", 37.77528946741323, 69.66461406952811),
    field("ls_dob_6", "R6 DOB", 47.63050902087604, 69.56514994984411),
    field("ls_breed_6", "R6 Breed", 61.125727827723395, 69.6596261592999),
    field("ls_color_6", "R6 Color", 72.54989820381697, 69.61238805457201),
    field("ls_val_6", "R6 Value", 82.77152432979541, 69.56514994984411),
];

const ADSS: &[DefaultPosition] = &[
    field("date_app", "Date of Application", 81.0627329656283, 8.149746882296622),
    field("farmer_id", "Farmer ID", 12.963789031452613, 9.425175709949734),
    field("last_name", "Last Name", 13.044290707993685, 11.692604736888601),
    field("first_name", "First Name", 30.61479836245337, 11.692604376490461),
    field("mid_name", "Middle Name", 45.85490964281363, 11.83431905107228),
    field("suffix", "Name Suffix", 60.35224865809026, 11.550890242505853),
    field("addr_street", "Street/Purok", 12.843866666307836, 16.74708158237502),
    field("addr_brgy", "Barangay", 25.53738930641179, 16.841557972029875),
    field("addr_muni", "Municipality", 41.7796207952013, 16.841557791830805),
    field("addr_prov", "Province", 56.0097277548968, 16.74708158237502),
    field("contact", "Contact", 77.98956432644523, 12.1177473190415),
    field("birthday", "Birthday", 76.45298000685369, 16.369176744551876),
    field("sex_male", "Male Check", 7.833265624161536, 20.76232048424593),
    field("sex_female", "Female Check", 14.447258999794652, 20.76232048424593),
    field("civ_single", "Single Check", 17.45361962508243, 24.872035595572626),
    field("civ_married", "Married Check", 22.397412653333447, 24.919273700300522),
    field("civ_widow", "Widow Check", 32.35180672373076, 24.824797490844734),
    field("civ_sep", "Separated Check", 44.17682518319602, 24.925141702781442),
    field("spouse", "Spouse Name", 69.17090649226773, 24.872035595572626),
    field("sec_ip", "IP Sector", 53.136983157399584, 20.856796693701718),
    field("sec_pwd", "PWD Sector", 23.273800946207643, 20.856796693701718),
    field("sec_sc", "SC Sector", 29.820986307945475, 20.76818920752313),
    field("sec_youth", "Youth Sector", 40.2816274923948, 20.72095038199896),
    field("bene_name", "Beneficiary Name", 20.393172236474925, 39.23241943285212),
    field("bene_rel", "Relationship", 77.36007520427741, 39.173151238281875),
    field("bene_birth", "Beneficiary Birthday", 78.4725737485608, 40.74990606582934),
    field("guardian", "Guardian Name", 20.12594018089379, 48.18506669268453),
    field("guardian_rel", "Guardian Relationship", 77.71444815862858, 47.61820943594981),
    field("guardian_birth", "Guardian Birthday", 78.98380042263898, 49.12982878724239),
    field("sign_name", "Signature Name", 69.67715360631975, 69.99029289239515),
    field("sign_date", "Sign Date", 75.42264280131418, 75.0920082030076),
    field("account_no", "Account No", 75.1089356167125, 53.073184118124786),
    field("rsbsa_id", "RSBSA ID", 28.189376977348395, 8.344567191064698),
    image("signature_img", "Signature Image", 80.87060742609567, 71.78534087205509),
    image("farmer_photo", "Farmer Photo", 5.027329040559608, 0.4971739163779445),
    image("guardian_signature_img", "Guardian Signature Image", 79.25103247822011, 83.33021949342208),
    field("guardian_sign_name", "Guardian Sig Name", 70.83322272741434, 81.58240961849003),
    field("guardian_sign_date", "Guardian Sign Date", 75.71020774177006, 85.8810771487283),
    field("adss_occupation", "Occupation", 23.53314888955327, 27.258586298227904),
    field("adss_work_addr", "Work Address", 60.47798057364532, 27.305824402955796),
    field("adss_premium", "Premium Amount", 39.366648182735574, 29.667729639350448),
    field("adss_cover", "Amount Cover", 39.166224141049724, 94.7146027328443),
    field("adss_ben1_name", "Primary Bene Name", 20.12594018089379, 43.76727748672985),
    field("adss_ben1_rel", "Primary Bene Relationship", 77.71444815862858, 43.436610753634604),
    field("adss_ben1_bday", "Primary Bene Birthday", 78.9169924087437, 44.90099200019929),
    field("adss_is_minor", "Is Minor Check", 6.6307213740464235, 84.59126699378132),
    field("mop_palawan", "MoP Palawan", 45.78021751668284, 53.1923057938412),
    field("mop_gcash", "MoP GCash", 6.58715079723523, 55.15752800783673),
    field("mop_landbank", "MoP Landbank", 6.497105346255856, 53.23954389856909),
    field("mop_others", "MoP Others", 45.759884631808085, 55.15752800783673),
    field("consent_certify_check", "Certify Check", 6.497105346255856, 68.07231166631261),
    field("consent_privacy_check", "Privacy Check", 6.831145415732276, 74.54393201403397),
];

const BANCA: &[DefaultPosition] = &[
    field("date_app", "Date of Application", 81.85654502013618, 11.314699899065456),
    field("farmer_id", "Farmer ID", 8.56815377700966, 19.156224923497568),
    field("last_name", "Last Name", 29.21183007065241, 17.502891258021307),
    field("first_name", "First Name", 50.1227384198763, 17.455653153293415),
    field("mid_name", "Middle Name", 76.57871192240876, 17.644605572204988),
    field("suffix", "Name Suffix", 66.49070182422088, 17.550129362749203),
    field("addr_street", "Street/Purok", 16.585115444443737, 24.116225919926336),
    field("addr_brgy", "Barangay", 27.20758965379389, 24.16346402465423),
    field("addr_muni", "Municipality", 41.838544696861085, 24.16346402465423),
    field("addr_prov", "Province", 58.40693214289151, 24.068987815198444),
    field("contact", "Contact", 18.856587916883395, 27.98975050761357),
    field("birthday", "Birthday", 76.71232795019932, 22.368416044994294),
    field("sex_male", "Male Check", 13.311522763574823, 31.349524666571178),
    field("sex_female", "Female Check", 21.862948542171175, 31.444000876026962),
    field("civ_single", "Single Check", 46.91595375290267, 31.538477085482747),
    field("civ_married", "Married Check", 56.80353980940469, 31.491238980754854),
    field("civ_widow", "Widow Check", 68.69536628276525, 31.444000876026962),
    field("civ_sep", "Separated Check", 81.85654502013618, 31.438132152749766),
    field("spouse", "Spouse Name", 23.13230080618157, 26.10022631849785),
    field("bene_name", "Beneficiary Name", 19.45786004194095, 33.8945135986002),
    field("bene_rel", "Relationship", 80.60835569509776, 34.29266272062421),
    field("bene_birth", "Beneficiary Birthday", 64.50762434633431, 34.13070412223967),
    field("guardian", "Guardian Name", 19.19062798635981, 35.83127589244382),
    field("guardian_rel", "Guardian Relationship", 50.0, 33.67),
    field("guardian_birth", "Guardian Birthday", 80.95, 33.67),
    field("sign_name", "Signature Name", 67.76005408823127, 87.48276720263924),
    field("sign_date", "Sign Date", 69.43025443561336, 91.20020191521914),
    field("account_no", "Account No", 42.50662483581392, 28.084226717069356),
    field("rsbsa_id", "RSBSA ID", 8.56815377700966, 20.957141266036565),
    image("signature_img", "Signature Image", 78.81989213506897, 88.31867752681765),
    image("farmer_photo", "Farmer Photo", 3.2235126653869406, 3.095269676412063),
    field("bn_home_port", "Home Port", 34.6900872100657, 64.43497471907975),
    field("bn_usage", "Usage", 26.405893487050484, 51.50669775432172),
    field("bn_boat_material", "Boat Material", 32.953078848788316, 43.021737716420525),
    field("bn_boat_type", "Boat Type", 25.80462136199293, 38.563457058879024),
    field("bn_motor_no", "Motor No", 26.606317528736334, 47.22592903720301),
    field("bn_chassis_no", "Chassis No", 26.472701500945767, 49.3516437499582),
    field("bn_boat_age", "Boat Age", 45.24575340552057, 55.72878788822375),
    field("bn_boat_color", "Boat Color", 26.3390854731552, 53.60307317546857),
    field("bn_dim_length", "Length", 62.14818092102742, 61.633548096025294),
    field("bn_dim_width", "Width", 41.97216072465165, 61.633548096025294),
    field("bn_dim_depth", "Depth", 23.265916833972135, 61.633548096025294),
    field("amount_cover", "Amount Cover", 32.48542275152133, 67.86897792010717),
    field("bn_period_from", "Period From", 34.89051125175155, 70.84497851796444),
    field("bn_period_to", "Period To", 54.799299392546175, 70.84497851796444),
    field("bn_mortgage_to", "Mortgage To", 20.259556208684355, 73.8682172205496),
    field("bn_mortgage_branch", "Mortgage Branch", 40.569192432850684, 75.33259846711428),
    field("bn_mortgage_addr", "Mortgage Address", 40.569192432850684, 76.93869402786264),
    field("bn_others", "Specifications", 26.405893487050484, 58.04345501989052),
];
