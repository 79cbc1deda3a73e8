pub mod configuration;

pub mod entity {
    pub mod category;
    pub mod entityconfig;
    pub mod specialholidays;
    pub mod ruletable;
    pub mod yearcontext;
}

pub mod groups {
    pub mod christianholidays;
    pub mod internationalholidays;
    pub mod weekdayholidays;
}

pub mod holiday {
    pub mod holidayerror;
    pub mod datelike;
    pub mod holidaynames;
    pub mod namelookup;
    pub mod slicestep;
    pub mod collectionoptions;
    pub mod holidaycollection;
}

pub mod observed {
    pub mod observedrule;
    pub mod observedengine;
}

pub mod registry {
    pub mod entityregistry;
}

pub mod rules {
    pub mod recurringholiday;
    pub mod fixeddateholiday;
    pub mod nthweekdayholiday;
    pub mod lastweekdayholiday;
    pub mod easterrelatedholiday;
    pub mod declarativetable;
}

pub mod time {
    pub mod utility;
}
