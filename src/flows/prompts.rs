//! User-facing texts and keyboards for both bots.
//!
//! Every string here is product copy shown in Telegram, bilingual
//! English/Amharic where the product is. Flows reference these constants
//! instead of embedding literals so the copy stays reviewable in one place.

use crate::records::ProfileView;
use crate::telegram::{InlineButton, Keyboard, ReplyButton};

use super::edit::{EditField, CANCEL_CALLBACK};

// ── Signal matching ─────────────────────────────────────────────────

/// The skip buttons carry decorations, so matching is by substring.
pub fn is_skip_signal(text: &str) -> bool {
    let text = text.to_lowercase();
    text.contains("skip") || text.contains("አሳልፍ")
}

pub fn is_done_signal(text: &str) -> bool {
    let text = text.to_lowercase();
    text.contains("done") || text.contains("ተጠናቋል")
}

/// Only an explicit yes deletes; anything else is a cancellation.
pub fn is_affirmative(text: &str) -> bool {
    let text = text.to_lowercase();
    text.contains("yes") || text.contains("አዎ")
}

/// Exact match against the requests bot's persistent menu entries.
pub fn is_requests_menu_button(text: &str) -> bool {
    text == REQUEST_BUTTON || text == COMPLAINT_BUTTON
}

// ── Registry bot: commands and registration ─────────────────────────

pub const REGISTRY_WELCOME: &str = "\n🎉 Welcome to Debo Bot! \n🎉 እንኳን ወደ ደቦ ቦት በሰላም መጡ \n \n✅ this bot is used to registor any Ethiopian professionals who are interested to find new job opportunities from thier nighbour to thier city. \n \n ⚠️any information you give to this bot will be given to people that want your contact to make you work for them \n \nplease use the below menu to continue \n \n✅ይህ ቦት የሙያ ባለቤት የሆኑ ማንኛውም  ኢትይጵያውያንን የምንመዘግብበትና ባቅርያብያቸው ያሉ የስራ እድሎችን እንዲያገኙ ከባለሙያ ፈላጊዎች ጋር በቀላሉ እንዲገናኙ የምናደርግበት ነው። \n  \n⚠️ በዚህ ቦት ላይ የሚያጋሯቸው መርጃዎችዎ ስራ ሊያሰሯችሁችሁ ለሚፈልጉ ሰዎች ይጋራሉ። \n \nለመቀጠል ከከስር ካሉት አማራጮች አንዱን ይጫኑ። \n \n ስለአሰራራችን የበለጠ ለማውቅ ወይም የትኛውም ጥይቄ ካልዎት ይህንን ይጫኑ";

/// Sent when a user first opens or unblocks the bot, before any command.
pub const NEW_MEMBER_WELCOME: &str = "\n               🎉Welcome to MUYA Bot!                                🎉እንኳን ወደ ሙያ ቦት በሰላም መጡ \n this bot is used to registor any Ethiopianprofessionals who are interested to find new job opportunities from their nighbour to their city. \n ይህ ቦት የሙያ ባለቤት የሆኑ ማንኛውም  ኢትይጵያውያንን የምንመዘግብበትና ባቅርያብያቸው ያሉ የስራ እድሎችን እና ባለሙያ ፈላጊዎችን በቀላሉ እንዲያገኙ የምናመቻችበት የምናደርግበት ቴክኖልጂ ነው። \n any information you give to this bot will be given to people that want your contact to make you work for them \n በዚህ ቦት ላይ የሚያጋሯቸው መርጃዎችዎ ስራ ሊያሰሯቹ ለሚፈልጉ ሰዎች ይሰጣልይ \\ንስለአሰራራችን የበለጠ ለማውቅ ወይም የትኛውም ጥይቄ ካልዎት ይህንን ይጫኑይጫኑ";

pub const ALREADY_REGISTERED: &str = "ℹ️You are already registered. / ደቦ ላይ ተመዝግበዋል";

pub const ASK_FULL_NAME: &str = "📝Enter your full name: / ሙሉ ስምዎን ያስገቡ";

pub const ASK_PROFESSION: &str = "🛠️Enter your profession: / ሙያዎን ያስገቡ \n⚠️ እባክዎን የተሰማሩበትን የስራ ዘርፍ በጥንቃቄ እና በግልጽ ይጻፉ።። \n \n ለምሳሌ ✅ ዶክተር ከማለት ኦንኮሎጂስት \n \n ✅ የቧምቧ ባለሙያ \n \n✅ ኢንጂነር ከማለት ሲቪል ኢንጂነር \n \n ✅ ተምላላሽ ሰራተኛ \n \n ✅ የኤሌክትሪክ ሰራተኛ \n \n✅ጠበቃ";

pub const ASK_PHONE: &str = "📞Enter your phone number: / ስል ቁጥርዎን ያስገቡ";

pub const INVALID_PHONE: &str = "Invalid phone number format. Please enter a valid phone number \n የተሳሳተ መረጃ አስገብተዋል እባክዎ ትክክለኝ የስልክ ቁጥር ፎርማት ይጠቀሙ (e.g., +251912345678 or 0912345678): / የስልክ ቁጥርዎ ትክክል አይደለም። ትክክለኛ ስልክ ቁጥር ያስገቡ (ለምሳሌ +251912345678 ወይም 0912345678):";

pub const ASK_LOCATION: &str = "Share your location or press Skip:/ የርስዎን ወይም የቢሮዎን መገኛ ያጋሩ ወይም Skip / አሳልፍ ይጫኑ";

pub const ASK_REGION: &str = "📍Enter your city / Region , subcity, wereda  \n የሚገኙበትን ክልል / ከተማ፣ ክፍለ ከተማ ፣ ወረዳ በቅደም ተከተል ያስገቡ \n ለምሳሌ ✅ አዲስ አበባ፣ አዲስ ከተማ፣ 11";

pub const ASK_TESTIMONIALS: &str = "📄Please upload your testimonial documents or images. You can upload multiple. use the buttons below skip or finish : \n እርስዎ ከዚ በፊት የሰርዋቸው እንደማስረጃ የሚያገለግሉ ስራዎችዎን ያስገቡ። \n \n ✅ የትኛውንም የፋይል አይነት ማስገባት ይችላሉ። \n \n ✅ከአንድ በላይ ፋይል ማስግባት ይችላሉ። \n \n ✅ አስገብተው ሲጨርሱ Done /ጨርሻለው የሚለውን ይጫኑ። \n \n ✅ የሚያስገቡት ማስረጃ ከሌሎት skip /አሳልፍን ይጫኑ።ይጫኑ።";

pub const TESTIMONIAL_RECEIVED: &str = "File received. Upload more or select an option: ማስረጃዎን በትክክል አስገብተዋል። ተጨማሪ ማስረጃ ያስገቡ ወይም ታች ካሉት አማርጮች አንዱን ይጠቀሙ።";

pub const NO_TESTIMONIALS_UPLOADED: &str = "No testimonial files were uploaded. Skipping.  \n ምንም አይነት የሰሯቸውን ስራዎች ማስርጃ አላስገቡም!";

pub const ASK_EDUCATION: &str = "🎓Please upload your educational background documents or images. You can upload multiple files. Or use the buttons below:  \n የትምህርት ማስረጃ ካልዎትያስገቡ። \n✅ የትኛውንም የፋይል አይነት ማስገባት ይችላሉ። \n ✅ከአንድ በላይ ፋይል ማስግባት ይችላሉ። ✅ አስገብተው ሲጨርሱ Done /ጨርሻለው የሚለውን ይጫኑ። \n ✅ የሚያስገቡት ማስረጃ ከሌሎት skip /አሳልፍን ይጫኑ።ይጫኑ።";

pub const EDUCATION_RECEIVED: &str = "Educational file received. Upload more or select an option:የትምህርት ማስረጃዎን በትክክል አስገብተዋል። ተጨማሪ ማስረጃ ያስገቡ ወይም ታች ካሉት አማርጮች አንዱን ይጠቀሙ።";

pub const NO_EDUCATION_UPLOADED: &str = "No educational files were uploaded. Skipping. ምንም አይነት የሰሯቸውን ስራዎች ማስርጃ አላስገቡም!";

pub const REGISTRATION_FILE_GUIDANCE: &str = "Please upload a document/photo or use the buttons.  የትኛውንም የፋይል አይነት ማስገባት ይችላሉ። አስገብተው ከጨረሱ skip / አሳልፍ ይጫኑይጫኑ";

pub const REGISTRATION_SAVED: &str = "✅Congradulations! Registration complete! from now on people who needs your profession will get you easily.\n እንኳን ደስ አለዎት ምዝገባዎን አጠናቀዋል። \n ከዚህ በኋላ ማንኛውም የርስዎን ሙያ የሚፈልግ ሰው በቀላሉ ያገኝዎታል!!!";

pub fn registration_save_failed(error: &str) -> String {
    format!("❌ Error saving your data: /መረጃዎን መመዝገብ አልተቻለም። እባክዎ ትንሽ ቆይተው ይሞክሩ። {error}")
}

// ── Registry bot: profile, edit, delete, comment ────────────────────

pub const NOT_REGISTERED_PROFILE: &str = "You are not registered. please click regiser. / አልተመዘገቡም. እባክዎ ምዝገባ የሚለውን ተጭነው ይመዝገቡ";

pub const PROFILE_INCOMPLETE: &str = "Your profile seems incomplete. Please re-register. / ምዝገባዎ አ እባክዎ ምዝገባ የሚለውን ተጭነው እንደገና ይመዝገቡ።";

pub fn profile_card(view: &ProfileView) -> String {
    format!(
        "Name: {}\nProfession: {}\nPhone: {}\nLocation: {}",
        view.full_name, view.profession, view.phone, view.location
    )
}

pub const NOT_REGISTERED_EDIT: &str = "You are not registered. Please use /register. / ከዚህ በፊት አልተመዘገቡም እባክዎን /ምዝገባን ተጭነው ይመዝገቡ።";

pub const EDIT_MENU_TITLE: &str = "Which information would you like to update? / የትኛውን መረጃዎን ማስተካከል ይፈልጋሉ?";

pub const EDIT_CANCELLED: &str = "Edit cancelled. / ማስተካክየ አቋርጠዋል።";

pub const MAIN_MENU_TITLE: &str = "Main Menu:";

pub const INVALID_EDIT_OPTION: &str = "Invalid option selected. Please try again። / የተሳሳተ አማርጭ መርጠዋል። እንደገና ይሞክሩ።";

pub const EDIT_NAME_PROMPT: &str = "Enter your updated full name:";
pub const EDIT_PROFESSION_PROMPT: &str = "Enter your updated profession:";
pub const EDIT_PHONE_PROMPT: &str = "Enter your updated phone number:";
pub const EDIT_LOCATION_PROMPT: &str = "Share your updated location or type 'skip':";
pub const EDIT_ADDRESS_PROMPT: &str = "Enter your updated Region, City, Woreda:";
pub const EDIT_TESTIMONIALS_PROMPT: &str =
    "Upload *all* your new testimonial documents/images. Type 'done' when finished or 'skip'.";
pub const EDIT_EDUCATION_PROMPT: &str =
    "Upload *all* your new educational documents/images. Type 'done' when finished or 'skip'.";

pub const INVALID_PHONE_EDIT: &str = "Invalid phone number format. Please enter a valid phone number (e.g., +251912345678 or 0912345678): / የስልክ ቁጥርዎ ትክክል አይደለም። ትክክለኛ ስልክ ቁጥር ያስገቡ (ለምሳሌ +251912345678 ወይም 0912345678):";

pub fn field_updated(label: &str) -> String {
    format!("✅ Your {label} has been updated.")
}

pub fn files_updated(label: &str) -> String {
    format!("✅ Your {label} have been updated.")
}

pub const UPDATE_FAILED: &str =
    "❌ Sorry, there was an error updating your information. Please try again later.";

pub fn files_update_failed(label: &str) -> String {
    format!("❌ Error saving your {label}. Please try again.")
}

pub fn no_new_files(label: &str) -> String {
    format!("No new files uploaded. Keeping existing {label}.")
}

pub const EDIT_LOCATION_INVALID: &str =
    "Invalid input. Please share location or use the 'Skip' button.";

pub const EDIT_FILE_RECEIVED: &str = "File received. Upload more or select an option:";

pub const UPLOAD_RETRY: &str =
    "Sorry, there was an error processing your file. Please try uploading again or use the buttons.";

pub const EDIT_FILE_GUIDANCE: &str = "Please upload a document/photo or use the buttons.";

pub const DELETE_CONFIRM: &str =
    "Are you sure you want to delete your profile? / መርጃዎን ለማጥፋት እርግጠኛ ነዎት?";

pub const PROFILE_DELETED: &str = "Profile deleted. / መረጃዎ ተደምስሷል";

pub const SERVICE_UNAVAILABLE: &str =
    "Service is temporarily unavailable. Please try again later.";

pub const DELETE_CANCELLED: &str = "Deletion cancelled. / ድምሰሳው ትቋርጧል";

pub const NOT_REGISTERED: &str = "You are not registered. / አልተመዘገቡም";

pub const ASK_COMMENT: &str = "Send your comment:  / አስተያየቶን ያላኩ፡";

pub const COMMENT_SAVED: &str = "Comment saved.";

pub const CANCELLED: &str = "Cancelled.";

pub const NETWORK_ERROR: &str = "⚠️ Network error! Please try again in a moment. / የአውታረ መረብ ስህተት! እባክዎ ትንሽ ቆይተው እንደገና ይሞክሩ።";

// ── Requests bot ────────────────────────────────────────────────────

pub const REQUESTS_WELCOME: &str =
    "Welcome! Please choose an option from the menu:\nእንኳን በሰላም መጡ! ከዝርዝሩ ውስጥ አንዱን ይምረጡ:";

pub const REQUEST_BUTTON: &str = "REQUEST PROFESSIONAL | ባለሙያ ይጠይቁ";
pub const COMPLAINT_BUTTON: &str = "COMPLAINT OR COMMENT | ቅሬታ ወይም አስተያየት";

pub const NEAR_ME_BUTTON: &str = "Near Me | ባቅራብያዬ";
pub const ANYWHERE_BUTTON: &str = "Anywhere | የትም ቦታ";

pub const ASK_REQUESTER_NAME: &str = "Please provide your full name:\nእባክዎ ሙሉ ስምዎን ያስገቡ:";

pub const IN_PROGRESS_NAME: &str = "You are already in the process of requesting a professional. Please provide your full name or /cancel.\nባለሙያ እየጠየቁ ነው። እባክዎ ሙሉ ስምዎን ያስገቡ ወይም /cancel ይጫኑ።";

pub const ASK_REQUESTER_PHONE: &str =
    "Please provide your phone number:\nእባክዎ ስልክ ቁጥርዎን ያስገቡ:";

pub const IN_PROGRESS_PHONE: &str = "You are currently providing your phone number. Please enter your phone number or /cancel.\nአሁን የስልክ ቁጥርዎን እያስገቡ ነው። እባክዎ ስልክ ቁጥርዎን ያስገቡ ወይም /cancel ይጫኑ።";

pub const REQUESTS_INVALID_PHONE: &str = "Invalid phone number format. Please enter a valid phone number (e.g., +251912345678 or 0912345678):\nየስልክ ቁጥር ቅርጸት ትክክል አይደለም። እባክዎ ትክክለኛ የስልክ ቁጥር ያስገቡ (ለምሳሌ +251912345678 ወይም 0912345678):";

pub const ASK_PROFESSIONAL_TYPE: &str =
    "What type of professional are you looking for?\nየምን አይነት ባለሙያ ይፈልጋሉ?";

pub const IN_PROGRESS_TYPE: &str = "You are currently specifying the professional type. Please enter the type of professional you are looking for or /cancel.\nአሁን የባለሙያ አይነት እየመረጡ ነው። እባክዎ የሚፈልጉትን የባለሙያ አይነት ያስገቡ ወይም /cancel ይጫኑ።";

pub const ASK_FILTER: &str =
    "How should the professionals be filtered?\nባለሙያዎቹ እንዴት ተደርገው ይፈለጉ?";

pub const INVALID_FILTER: &str =
    "Invalid option. Please choose 'Near Me | ባቅራብያዬ' or 'Anywhere | የትም ቦታ'.";

pub const ASK_SHARE_LOCATION: &str = "Please share your location:\nእባክዎ አካባቢዎን ያጋሩ:";

pub const LOCATION_THANKS_ASK_ADDRESS: &str = "Thank you for sharing your location. Please enter your City/Subcity/Wereda:\nአካባቢዎን ስላጋሩ እናመሰግናለን። እባክዎ ከተማ / ክፍለ ከተማ / ወረዳ ያስገቡ:";

pub const REQUESTS_LOCATION_INVALID: &str = "Invalid input. Please share your location using the button.\nየተሳሳተ ግቤት። እባክዎ ቁልፉን በመጠቀም አካባቢዎን ያጋሩ።";

pub const ASK_ADDRESS: &str =
    "Please enter your City/Subcity/Wereda:\nእባክዎ ከተማ / ክፍለ ከተማ / ወረዳ ያስገቡ:";

pub const IN_PROGRESS_ADDRESS: &str = "You are currently providing your address. Please enter your City/Subcity/Wereda or /cancel.\nአሁን አድራሻዎን እያስገቡ ነው። እባክዎ ከተማ / ክፍለ ከተማ / ወረዳ ያስገቡ ወይም /cancel ይጫኑ።";

pub const ASK_COUNT: &str =
    "How many professional contacts do you need?\nስንት የባለሙያ አድራሻ ይፈልጋሉ?";

pub const REQUEST_SAVED: &str = "Thank you! Your request has been submitted. We will get back to you shortly.\nአመሰግናለሁ! ጥያቄዎ ገብቷል. በቅርቡ ምላሽ እንሰጥዎታለን።";

pub const REQUEST_SAVE_FAILED: &str = "Sorry, there was an error submitting your request. Please try again later.\nይቅርታ፣ ጥያቄዎን በማስገባት ላይ ስህተት ተፈጥሯል። እባክዎ ቆይተው እንደገና ይሞክሩ።";

pub const ASK_COMPLAINT: &str =
    "Please enter your complaint or comment:\nእባክዎ ቅሬታዎን ወይም አስተያየትዎን ያስገቡ:";

pub const IN_PROGRESS_COMPLAINT: &str = "You are currently writing a complaint or comment. Please enter your feedback or /cancel.\nአሁን ቅሬታ ወይም አስተያየት እየጻፉ ነው። እባክዎ ግብረመልስዎን ያስገቡ ወይም /cancel ይጫኑ።";

pub const COMPLAINT_SAVED: &str = "Thank you! Your complaint or comment has been submitted.\nአመሰግናለሁ! ቅሬታዎ ወይም አስተያየትዎ ገብቷል።";

pub const COMPLAINT_SAVE_FAILED: &str = "Sorry, there was an error submitting your complaint or comment. Please try again later.\nይቅርታ፣ ቅሬታዎን ወይም አስተያየትዎን በማስገባት ላይ ስህተት ተፈጥሯል። እባክዎ ቆይተው እንደገና ይሞክሩ።";

pub const REQUESTS_CANCELLED: &str = "Operation cancelled.\nስራው ተቋርጧል።";

// ── Keyboards ───────────────────────────────────────────────────────

/// Persistent main menu of the registry bot.
pub fn registry_main_menu() -> Keyboard {
    Keyboard::Reply {
        rows: vec![
            vec![
                ReplyButton::text("/register ምዝገባ"),
                ReplyButton::text("/editprofile መረጃ ያስተካክሉ"),
            ],
            vec![
                ReplyButton::text("/profile መረጃን አሳይ "),
                ReplyButton::text("/deleteprofile መረጃ ሰርዝ"),
            ],
            vec![ReplyButton::text("/comment አስተያየት")],
        ],
        one_time: false,
    }
}

pub fn skip_done_keyboard() -> Keyboard {
    Keyboard::Reply {
        rows: vec![vec![
            ReplyButton::text("Done ጨርሻያለው✅ "),
            ReplyButton::text("Skip እለፍ⏭️"),
        ]],
        one_time: true,
    }
}

pub fn yes_no_keyboard() -> Keyboard {
    Keyboard::Reply {
        rows: vec![vec![
            ReplyButton::text("Yes አዎ✅"),
            ReplyButton::text("No አይ❌"),
        ]],
        one_time: true,
    }
}

pub fn registration_location_keyboard() -> Keyboard {
    Keyboard::Reply {
        rows: vec![
            vec![ReplyButton::location(
                "📍Share Location / የርስዎን ወይም የቢሮዎን መገኛ ያጋሩ ",
            )],
            vec![ReplyButton::text("Skip / አሳልፍ")],
        ],
        one_time: true,
    }
}

pub fn edit_location_keyboard() -> Keyboard {
    Keyboard::Reply {
        rows: vec![
            vec![ReplyButton::location("Share Location / አካባቢዎን ያጋሩ ")],
            vec![ReplyButton::text("Skip / አሳልፍ")],
        ],
        one_time: true,
    }
}

/// Inline menu of editable fields plus a cancel row.
pub fn edit_menu_keyboard() -> Keyboard {
    let mut rows: Vec<Vec<InlineButton>> = EditField::ALL
        .iter()
        .map(|field| vec![InlineButton::new(field.menu_label(), field.callback_data())])
        .collect();
    rows.push(vec![InlineButton::new("❌ Cancel / አቋርጥ", CANCEL_CALLBACK)]);
    Keyboard::Inline(rows)
}

/// Persistent main menu of the requests bot.
pub fn requests_main_menu() -> Keyboard {
    Keyboard::Reply {
        rows: vec![vec![
            ReplyButton::text(REQUEST_BUTTON),
            ReplyButton::text(COMPLAINT_BUTTON),
        ]],
        one_time: false,
    }
}

pub fn filter_keyboard() -> Keyboard {
    Keyboard::Reply {
        rows: vec![
            vec![ReplyButton::text(NEAR_ME_BUTTON)],
            vec![ReplyButton::text(ANYWHERE_BUTTON)],
        ],
        one_time: true,
    }
}

pub fn share_location_keyboard() -> Keyboard {
    Keyboard::Reply {
        rows: vec![vec![ReplyButton::location("Share Location | አካባቢዎን ያጋሩ")]],
        one_time: true,
    }
}

pub fn count_keyboard() -> Keyboard {
    Keyboard::Reply {
        rows: vec![
            vec![
                ReplyButton::text("3"),
                ReplyButton::text("5"),
                ReplyButton::text("10"),
            ],
            vec![
                ReplyButton::text("20"),
                ReplyButton::text("More than 20"),
            ],
        ],
        one_time: true,
    }
}
