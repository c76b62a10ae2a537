//! Square roots compared against decimal references with 350 digits, which
//! are enough for 1000 bits.

use sqrtfloat::{Accuracy, Float};

const REFERENCES: [(&str, &str); 7] = [
    (
        "0.5",
        "0.70710678118654752440084436210484903928483593768847403658833986\
         8995366239231053519425193767163820786367506923115456148512462418\
         0279253686063220607485499679157066113329637527963778999752505763\
         9103028573505477998580298513726729843100736425870932044459930477\
         6164615242154357160725419881301813997625703994843626698273165904\
         41482031030762917619752737287514",
    ),
    (
        "2.0",
        "1.41421356237309504880168872420969807856967187537694807317667973\
         7990732478462107038850387534327641572735013846230912297024924836\
         0558507372126441214970999358314132226659275055927557999505011527\
         8206057147010955997160597027453459686201472851741864088919860955\
         2329230484308714321450839762603627995251407989687253396546331808\
         8296406206152583523950547457503",
    ),
    (
        "3.0",
        "1.73205080756887729352744634150587236694280525381038062805580697\
         9451933016908800037081146186757248575675626141415406703029969945\
         0949989524788116555120943736485280932319023055820679748201010846\
         7492326501531234326690332288665067225466892183797122704713166036\
         7861588019049986537379859389467650347506576050756618348129606100\
         9476021871903250831458295239598",
    ),
    (
        "4.0",
        "2.0",
    ),
    (
        "5",
        "2.23606797749978969640917366873127623544061835961152572427089724\
         5410520925637804899414414408378782274969508176150773783504253267\
         7244470738635863601215334527088667781731918791658112766453226398\
         5658053576135041753378500342339241406444208643253909725259262722\
         8876299517402440681611775908909498492371390729728898482088641542\
         6898940991316935770197486788844",
    ),
    (
        "6",
        "2.44948974278317809819728407470589139196594748065667012843269256\
         7250960377457315026539859433104640234818594601226614189124858865\
         4598377573416257839512372785528289127475276765712476301052709117\
         7022348131067898669085363244335254560403380880893937458556784657\
         4724361304144270270216174201838300081589807838013089700728693993\
         6308371580944008004437386875492",
    ),
    (
        "7",
        "2.64575131106459059050161575363926042571025918308245018036833445\
         9201068823230283627760392886474543610615064578338497463095743529\
         8886272147844273905558801077227171507297283238922996895948650872\
         6070097805420372382802371594110034193911600157852559630594574103\
         5152396802716407373799074041581519904403474319453671399730597005\
         0513996922375456160971190273782",
    ),
];

const PRECISIONS: [usize; 13] = [24, 53, 64, 100, 200, 300, 400, 500, 600, 700, 800, 900, 1000];

#[test]
fn test_sqrt_reference_values() {
    for (x, want) in REFERENCES {
        for prec in PRECISIONS {
            let x = Float::parse(prec, x).unwrap();
            let want = Float::parse(prec, want).unwrap();
            let (root, acc) = x.sqrt().unwrap();
            assert_eq!(root.get_precision(), prec);
            assert_eq!(root, want, "prec = {}, sqrt({}) = {}, want {}", prec, x, root, want);
            // Only sqrt(4) is exact.
            assert_eq!(acc == Accuracy::Exact, root == Float::from_u64(prec, 2));
        }
    }
}

#[test]
fn test_sqrt2_double() {
    let (root, acc) = Float::from_u64(53, 2).sqrt().unwrap();
    assert!(root.to_string().starts_with("1.4142135623730951"));
    assert_eq!(root.to_f64(), (std::f64::consts::SQRT_2, Accuracy::Exact));
    assert_eq!(acc, Accuracy::RoundedUp);
}

#[test]
fn test_sqrt_wide_precisions() {
    // Beyond the references: the square of the root brackets the input.
    for prec in [2000, 4000] {
        let x = Float::from_u64(prec, 3);
        let (root, acc) = x.sqrt().unwrap();
        assert_eq!(root.get_precision(), prec);
        let wide = root.cast(2 * prec);
        let square = &wide * &wide;
        match acc {
            Accuracy::RoundedDown => assert!(square < x),
            Accuracy::RoundedUp => assert!(square > x),
            Accuracy::Exact => panic!("sqrt(3) is not exact"),
        }
        // The root agrees with the 1000-bit reference.
        let reference = Float::parse(1000, REFERENCES[2].1).unwrap();
        assert_eq!(root.cast(1000), reference);
    }
}
