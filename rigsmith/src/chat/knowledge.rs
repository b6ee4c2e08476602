use crate::component::Category;

pub struct Topic {
    pub description: &'static str,
    pub important_specs: &'static [&'static str],
}

pub fn topic(category: Category) -> Option<Topic> {
    let topic = match category {
        Category::Cpu => Topic {
            description: "The central processing unit (CPU) is the brain of the computer. It runs \
                          instructions and does most of the general-purpose work.",
            important_specs: &["cores", "threads", "clock speed", "cache", "socket"],
        },
        Category::Gpu => Topic {
            description: "The graphics processing unit (GPU) renders images and can accelerate \
                          some compute workloads.",
            important_specs: &["VRAM", "shader cores", "clock speed", "memory bus width"],
        },
        Category::Ram => Topic {
            description: "Random access memory (RAM) holds the data the CPU is working on right now.",
            important_specs: &["capacity", "speed", "latency", "type (DDR4, DDR5)"],
        },
        Category::Storage => Topic {
            description: "Storage keeps your data when the machine is off. SSDs are fast, HDDs give \
                          more capacity per dollar.",
            important_specs: &["type (SSD/HDD)", "capacity", "read/write speed", "interface"],
        },
        Category::Motherboard => Topic {
            description: "The motherboard connects every component and decides what the build can \
                          be compatible with and expanded to.",
            important_specs: &["CPU socket", "chipset", "form factor", "expansion slots", "ports"],
        },
        Category::Psu => Topic {
            description: "The power supply unit (PSU) feeds power to all the other components.",
            important_specs: &["wattage", "efficiency rating (80+ Bronze/Gold/Platinum)", "modularity"],
        },
        Category::Case | Category::Cooler => return None,
    };
    Some(topic)
}

/// Per-profile buying advice for one category.
pub fn advice(category: Category, usage_type: &str) -> Option<&'static str> {
    use Category::*;
    let text = match (category, usage_type) {
        (Cpu, "gaming") => "For gaming, look for high clock speeds and strong single-core performance.",
        (Cpu, "design") | (Cpu, "development") => {
            "For design and development work, prioritize many cores and threads."
        }
        (Cpu, "office") => "For office use, a mid-range CPU is plenty.",
        (Gpu, "gaming") => "For gaming, pick the GPU that performs well at your target resolution.",
        (Gpu, "design") => "For design work, prioritize plenty of VRAM and professional API support.",
        (Gpu, "development") => "For development, a modest GPU is enough unless you train models.",
        (Gpu, "office") => "For office use, integrated or entry-level graphics are enough.",
        (Ram, "gaming") => "For gaming, 16GB to 32GB of fast RAM is recommended.",
        (Ram, "design") | (Ram, "development") => "For professional work, 32GB or more, depending on your tools.",
        (Ram, "office") => "For office use, 8GB to 16GB is enough.",
        (Storage, "gaming") => "For gaming, an SSD for the system and games, with an optional HDD for bulk storage.",
        (Storage, "design") | (Storage, "development") => {
            "For professional work, fast NVMe SSDs sized to your projects."
        }
        (Storage, "office") => "For office use, an SSD for the system is recommended.",
        (Motherboard, "gaming") => "For gaming, look for good overclocking support and a matching socket.",
        (Motherboard, "design") | (Motherboard, "development") => {
            "For professional work, prioritize plenty of ports and expansion options."
        }
        (Motherboard, "office") => "For office use, a basic board is enough.",
        (Psu, "gaming") => "For high-end gaming, 650W to 850W with a good efficiency rating.",
        (Psu, "design") | (Psu, "development") => "For powerful workstations, 850W or more with a high efficiency rating.",
        (Psu, "office") => "For office use, 450W to 550W is usually enough.",
        _ => return None,
    };
    Some(text)
}

pub const COMPATIBILITY: &str = "Compatibility between components matters. The main points:\n\n\
    - the CPU socket must match the motherboard\n\
    - the RAM type must be one the motherboard supports (DDR4, DDR5, ...)\n\
    - the power supply must deliver enough wattage for everything else\n\
    - the case must have room for all components\n\n\
    Every build I recommend is checked for these automatically.";

pub const BUDGET: &str = "Budget is a big factor. Some rough guidelines:\n\n\
    - entry level ($500-700): basic tasks and some casual gaming\n\
    - mid range ($700-1200): solid 1080p gaming and productive work\n\
    - high end ($1200-2000): great 1440p gaming and professional work\n\
    - enthusiast ($2000+): top performance for 4K gaming and heavy workloads\n\n\
    What's your budget? I can split it across components for you.";

pub const HELP: &str = "I can help you pick parts for your PC. Ask me about CPUs, GPUs, RAM, \
    storage, motherboards or power supplies, or tell me your budget and what you'll use the \
    machine for and I'll put a build together.";

pub const UNKNOWN_COMPONENT: &str = "I don't have details on that component. I can help with \
    CPUs, GPUs, RAM, storage, motherboards and power supplies.";
