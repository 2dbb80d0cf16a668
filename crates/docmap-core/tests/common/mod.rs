//! Sample models shared by the integration tests.
//!
//! `Person` uses plain renamed fields and default converters. `Annotated`
//! exercises everything else: root name, key order, ignored keys,
//! skip-when-empty, custom date patterns, an unwrapped record, a catch-all map
//! and a parent/child relation with `Car`.
#![allow(dead_code)]

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use docmap_core::{
    convert_labeled, convert_mapped, BackLink, DateFormat, Include, Labeled, Mapped, Optional,
    ReferenceRelation, TypeDescriptor,
};
use std::collections::BTreeMap;
use std::sync::OnceLock;

// ============================================================================
// Profession
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profession {
    pub title: String,
    pub salary: i32,
}

impl Mapped for Profession {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: OnceLock<TypeDescriptor<Profession>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            TypeDescriptor::<Profession>::builder("Profession")
                .field("title", |p| &p.title, |p, v| p.title = v)
                .field("salary", |p| &p.salary, |p, v| p.salary = v)
                .build()
        })
    }
}

convert_mapped!(Profession);

pub fn engineer() -> Profession {
    Profession {
        title: "Software Engineer".to_owned(),
        salary: 45000,
    }
}

// ============================================================================
// Person
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Labeled for Gender {
    fn variants() -> &'static [Self] {
        &[Gender::Male, Gender::Female]
    }

    fn label(self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
        }
    }
}

convert_labeled!(Gender);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    pub created_at: Option<DateTime<FixedOffset>>,
    pub hobbies: Vec<String>,
    pub profession: Profession,
    pub personal_projects_completion: BTreeMap<String, f64>,
}

impl Mapped for Person {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: OnceLock<TypeDescriptor<Person>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            TypeDescriptor::<Person>::builder("Person")
                .field("first_name", |p| &p.first_name, |p, v| p.first_name = v)
                .rename("firstName")
                .required()
                .field("last_name", |p| &p.last_name, |p, v| p.last_name = v)
                .rename("lastName")
                .field("gender", |p| &p.gender, |p, v| p.gender = v)
                .field("birth_date", |p| &p.birth_date, |p, v| p.birth_date = v)
                .rename("birthDate")
                .field("created_at", |p| &p.created_at, |p, v| p.created_at = v)
                .rename("createdAt")
                .field("hobbies", |p| &p.hobbies, |p, v| p.hobbies = v)
                .field("profession", |p| &p.profession, |p, v| p.profession = v)
                .field(
                    "personal_projects_completion",
                    |p| &p.personal_projects_completion,
                    |p, v| p.personal_projects_completion = v,
                )
                .rename("personalProjectsCompletion")
                .build()
        })
    }
}

convert_mapped!(Person);

pub const PERSON_JSON: &str = r#"{
  "firstName": "Billel",
  "lastName": "KETROUCI",
  "gender": "MALE",
  "birthDate": "1996-09-09",
  "createdAt": "2023-03-08T12:04:53+01:00",
  "hobbies": ["Mangas", "Sports"],
  "profession": {"title": "Software Engineer", "salary": 45000},
  "personalProjectsCompletion": {"Mangas": 0.01, "Video Game": 0.02}
}"#;

pub fn plus_one_hour() -> FixedOffset {
    FixedOffset::east_opt(3600).unwrap()
}

pub fn created_at() -> DateTime<FixedOffset> {
    plus_one_hour()
        .with_ymd_and_hms(2023, 3, 8, 12, 4, 53)
        .unwrap()
}

pub fn birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1996, 9, 9).unwrap()
}

pub fn projects() -> BTreeMap<String, f64> {
    [("Mangas".to_owned(), 0.01), ("Video Game".to_owned(), 0.02)]
        .into_iter()
        .collect()
}

pub fn billel() -> Person {
    Person {
        first_name: "Billel".to_owned(),
        last_name: "KETROUCI".to_owned(),
        gender: Some(Gender::Male),
        birth_date: Some(birth_date()),
        created_at: Some(created_at()),
        hobbies: vec!["Mangas".to_owned(), "Sports".to_owned()],
        profession: engineer(),
        personal_projects_completion: projects(),
    }
}

// ============================================================================
// Annotated person and cars
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalGender {
    Male,
    Female,
}

impl Labeled for LocalGender {
    fn variants() -> &'static [Self] {
        &[LocalGender::Male, LocalGender::Female]
    }

    fn label(self) -> &'static str {
        match self {
            LocalGender::Male => "Homme",
            LocalGender::Female => "Femme",
        }
    }
}

convert_labeled!(LocalGender);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Car {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub owner: BackLink<Annotated>,
}

impl Mapped for Car {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: OnceLock<TypeDescriptor<Car>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            TypeDescriptor::<Car>::builder("Car")
                .field("make", |c| &c.make, |c, v| c.make = v)
                .field("model", |c| &c.model, |c, v| c.model = v)
                .field("year", |c| &c.year, |c, v| c.year = v)
                .back_reference("owner", "cars")
                .build()
        })
    }
}

convert_mapped!(Car);

pub fn car(make: &str, model: &str, year: i32) -> Car {
    Car {
        make: make.to_owned(),
        model: model.to_owned(),
        year,
        owner: BackLink::new(),
    }
}

pub const BIRTH_DATE_PATTERN: &str = "%d/%m/%Y";
pub const CREATED_AT_PATTERN: &str = "%d/%m/%Y - %H:%M:%S%.3f %z";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotated {
    pub full_name: String,
    pub personal_projects: BTreeMap<String, f64>,
    pub gender: Option<LocalGender>,
    pub json: String,
    pub birth_date: Option<NaiveDate>,
    pub profession: Profession,
    pub cars: Vec<Car>,
    pub created_at: Option<DateTime<FixedOffset>>,
}

impl Mapped for Annotated {
    fn descriptor() -> &'static TypeDescriptor<Self> {
        static DESCRIPTOR: OnceLock<TypeDescriptor<Annotated>> = OnceLock::new();
        DESCRIPTOR.get_or_init(|| {
            TypeDescriptor::<Annotated>::builder("Annotated")
                .root_name("person")
                .order(["full_name", "birth_date", "title", "salary"])
                .ignore_keys(["gender"])
                .default_include(Include::SkipWhenEmpty)
                .field("full_name", |a| &a.full_name, |a, v| a.full_name = v)
                .catch_all(
                    "personal_projects",
                    |a| &a.personal_projects,
                    |a, v| a.personal_projects = v,
                )
                .field("gender", |a| &a.gender, |a, v| a.gender = v)
                .ignored("json")
                .field_with(
                    "birth_date",
                    Optional(DateFormat::new(BIRTH_DATE_PATTERN)),
                    |a| &a.birth_date,
                    |a, v| a.birth_date = v,
                )
                .unwrapped("profession", |a| &a.profession, |a, v| a.profession = v)
                .field("cars", |a| &a.cars, |a, v| a.cars = v)
                .managed("cars")
                .field_with(
                    "created_at",
                    Optional(DateFormat::new(CREATED_AT_PATTERN)),
                    |a| &a.created_at,
                    |a, v| a.created_at = v,
                )
                .rename("createdAt")
                .build()
        })
    }
}

convert_mapped!(Annotated);

fn owned_cars(owner: &Annotated) -> &[Car] {
    &owner.cars
}

fn car_owner(car: &Car) -> &BackLink<Annotated> {
    &car.owner
}

pub const CARS: ReferenceRelation<Annotated, Car> =
    ReferenceRelation::new("cars", owned_cars, car_owner);

pub fn annotated() -> Annotated {
    Annotated {
        full_name: "Billel KETROUCI".to_owned(),
        personal_projects: projects(),
        gender: Some(LocalGender::Male),
        json: r#"{"car":{"mark":"Audi","year":2018}}"#.to_owned(),
        birth_date: Some(birth_date()),
        profession: engineer(),
        cars: vec![car("BMW", "3000", 2018), car("Audi", "A4", 2016)],
        created_at: Some(created_at()),
    }
}

pub const ANNOTATED_JSON: &str = concat!(
    r#"{"person":{"full_name":"Billel KETROUCI","birth_date":"09/09/1996","#,
    r#""title":"Software Engineer","salary":45000,"#,
    r#""cars":[{"make":"BMW","model":"3000","year":2018},{"make":"Audi","model":"A4","year":2016}],"#,
    r#""createdAt":"08/03/2023 - 12:04:53.000 +0100","Mangas":0.01,"Video Game":0.02}}"#,
);
